mod health;
mod report;

macros_utils::routes! {
    route health::health_route,
    route report::report_route,
}
