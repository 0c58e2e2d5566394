use std::fs;

use actix_files::Files;
use actix_web::web::ServiceConfig;
use log::warn;

use crate::repos::file::ReceiptStore;

/// Serves stored receipts under the media URL, when that URL is a local path
pub fn file_endpoints(config: &mut ServiceConfig, receipts: &ReceiptStore) {
    let mount_path = receipts.url_prefix().trim_end_matches('/');
    if !mount_path.starts_with('/') {
        return;
    }

    // Files resolves the directory once, it has to exist before mounting
    if let Err(e) = fs::create_dir_all(receipts.root()) {
        warn!("Couldn't create media root {:?}: {e}", receipts.root());
        return;
    }

    config.service(Files::new(mount_path, receipts.root()));
}
