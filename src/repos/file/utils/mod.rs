use sha2::{Digest, Sha256};

/// function that giving n reference to arguments, returns the hashed key in string format
pub fn hashing_composite_key(args: &[&str]) -> String {
    let hashed_args = Sha256::digest(args.concat());

    //X is for hexadecimal
    format!("{:X}", hashed_args)
}

/// Extension of the uploaded file name, lower-cased and restricted to ascii alphanumerics
pub fn receipt_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .filter(|extension| {
            !extension.is_empty()
                && extension.len() <= 8
                && extension.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "bin".to_owned())
}
