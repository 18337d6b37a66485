use percent_encoding::percent_decode_str;

use crate::contract::ValidationError;

pub const EVENTS_TABLE: &str = "all_events";
pub const EVENTS_PREFIX: &str = "events";
pub const MIN_KEY_SEGMENTS: usize = 5;

/// Hour-level partition derived from one object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    pub bucket: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
}

impl PartitionDescriptor {
    /// Keys look like `<anything>/<YYYY>/<MM>/<DD>/<HH>/<file...>`; only
    /// segments 1 through 4 are read.
    pub fn from_object(bucket: &str, raw_key: &str) -> Result<Self, ValidationError> {
        if bucket.trim().is_empty() {
            return Err(ValidationError::new("bucket name cannot be empty"));
        }

        let key = decode_object_key(raw_key)?;
        let parts: Vec<&str> = key.split('/').collect();
        if parts.len() < MIN_KEY_SEGMENTS {
            return Err(ValidationError::new(format!(
                "object key '{key}' has {} segments, expected at least {MIN_KEY_SEGMENTS}",
                parts.len()
            )));
        }

        if let Some(segment) = parts[1..MIN_KEY_SEGMENTS]
            .iter()
            .find(|segment| segment.contains('\''))
        {
            return Err(ValidationError::new(format!(
                "object key segment '{segment}' cannot contain a quote"
            )));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            year: parts[1].to_string(),
            month: parts[2].to_string(),
            day: parts[3].to_string(),
            hour: parts[4].to_string(),
        })
    }

    pub fn ingest_timestamp(&self) -> String {
        format!(
            "{}-{}-{} {}:00:00",
            self.year, self.month, self.day, self.hour
        )
    }

    pub fn location(&self) -> String {
        format!(
            "s3://{}/{EVENTS_PREFIX}/{}/{}/{}/{}",
            self.bucket, self.year, self.month, self.day, self.hour
        )
    }

    pub fn output_location(&self) -> String {
        format!("s3://{}/temp", self.bucket)
    }

    pub fn add_partition_statement(&self) -> String {
        format!(
            "ALTER TABLE {EVENTS_TABLE} ADD IF NOT EXISTS PARTITION (ingest_timestamp='{}') LOCATION '{}'",
            self.ingest_timestamp(),
            self.location()
        )
    }
}

/// Notification keys are form-encoded: `+` is a space and `%XX` an escaped
/// byte. Malformed escapes are kept verbatim.
pub fn decode_object_key(raw: &str) -> Result<String, ValidationError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ValidationError::new(format!("object key '{raw}' is not valid UTF-8")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_time_segments_into_partition() {
        let descriptor =
            PartitionDescriptor::from_object("my-bucket", "bucket-events/2024/01/15/09/file.json")
                .expect("key should parse");

        assert_eq!(descriptor.ingest_timestamp(), "2024-01-15 09:00:00");
        assert_eq!(descriptor.location(), "s3://my-bucket/events/2024/01/15/09");
        assert_eq!(descriptor.output_location(), "s3://my-bucket/temp");
    }

    #[test]
    fn builds_add_partition_statement() {
        let descriptor =
            PartitionDescriptor::from_object("my-bucket", "events/2023/12/31/23/part-0")
                .expect("key should parse");

        assert_eq!(
            descriptor.add_partition_statement(),
            "ALTER TABLE all_events ADD IF NOT EXISTS PARTITION \
             (ingest_timestamp='2023-12-31 23:00:00') \
             LOCATION 's3://my-bucket/events/2023/12/31/23'"
        );
    }

    #[test]
    fn five_segments_is_enough() {
        let descriptor = PartitionDescriptor::from_object("b", "x/2024/02/03/04")
            .expect("five segments should parse");
        assert_eq!(descriptor.hour, "04");
    }

    #[test]
    fn rejects_short_keys() {
        for key in ["", "events", "events/2024/01/15"] {
            let error = PartitionDescriptor::from_object("my-bucket", key)
                .expect_err("short key should fail");
            assert!(error.message().contains("expected at least 5"));
        }
    }

    #[test]
    fn rejects_quotes_in_interpolated_segments() {
        let error = PartitionDescriptor::from_object("b", "x/2024/01/15'/09/f")
            .expect_err("quote should fail");
        assert!(error.message().contains("quote"));
    }

    #[test]
    fn decodes_form_encoded_keys() {
        assert_eq!(
            decode_object_key("raw+events/2024/01/15/09/a%3Db.json").expect("decodes"),
            "raw events/2024/01/15/09/a=b.json"
        );
        assert_eq!(decode_object_key("bad%zz").expect("kept verbatim"), "bad%zz");
        assert_eq!(decode_object_key("trailing%4").expect("kept verbatim"), "trailing%4");
        assert!(decode_object_key("x/%FF/y").is_err());
    }
}
