//! HTTP request handlers for the image service.

pub mod health;
pub mod images;
pub mod metrics;
pub mod validate;

pub use health::health_check;
pub use images::get_image;
pub use metrics::metrics_handler;
pub use validate::request_nonce;
