use rand::Rng;

pub const BUCKET_NAME_PREFIX: &str = "due-database-";
pub const BUCKET_SUFFIX_LEN: usize = 10;
const BUCKET_SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Suggested bucket name. Not checked for availability or uniqueness.
pub fn bucket_name(region: &str) -> String {
    bucket_name_with_rng(&mut rand::thread_rng(), region)
}

pub fn bucket_name_with_rng(rng: &mut impl Rng, region: &str) -> String {
    let suffix: String = (0..BUCKET_SUFFIX_LEN)
        .map(|_| {
            let index = rng.gen_range(0..BUCKET_SUFFIX_ALPHABET.len());
            char::from(BUCKET_SUFFIX_ALPHABET[index])
        })
        .collect();
    format!("{BUCKET_NAME_PREFIX}{suffix}{region}")
}
