pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use codec::TokenCodec;
pub use codec::HEADER_SEGMENT;
pub use errors::JwtError;
