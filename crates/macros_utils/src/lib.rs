//! Small macros shared by the sitzprobe apps.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web;

/// Generate a `routes` function registering every listed actix service.
///
/// ```ignore
/// macros_utils::routes! {
///     route health::health_route,
///     route report::report_route,
/// }
///
/// App::new().configure(routes::routes)
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(route $service:path),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $( cfg.service($service); )*
        }
    };
}
