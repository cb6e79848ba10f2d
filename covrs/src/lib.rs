#[cfg(feature = "core")]
#[doc(inline)]
pub use covrs_core as core;

#[cfg(feature = "array")]
#[doc(inline)]
pub use covrs_array as array;

#[cfg(feature = "cover")]
#[doc(inline)]
pub use covrs_cover as cover;
