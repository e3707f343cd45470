//! User-facing strings. The UI is Arabic.

pub const RATE_LIMITED: &str = "تم الوصول إلى الحد الأقصى للطلبات. حاول لاحقًا.";
pub const CONNECTION_FAILED: &str = "حدث خطأ أثناء الاتصال";
pub const UNKNOWN_ERROR: &str = "خطأ غير معروف";
pub const NO_MOVIES_FOUND: &str = "لم يتم العثور على أفلام";
pub const MOVIE_NOT_FOUND: &str = "لم يتم العثور على الفيلم";
