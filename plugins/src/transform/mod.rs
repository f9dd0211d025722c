//! Ready-made `beforeSave` / `afterLoad` hook pairs.

pub mod base64;
pub mod prefix;

pub use self::base64::Base64Codec;
pub use prefix::PrefixFraming;
