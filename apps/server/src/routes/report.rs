use actix_web::{HttpResponse, Responder, get, web};
use sitzprobe::ReportAggregator;

/// Current probe report, same shape as the plugin's `sitzprobe-report`
#[get("/report")]
pub async fn report_route(report: web::Data<ReportAggregator>) -> impl Responder {
    HttpResponse::Ok().json(report.report())
}
