use crate::{
    api::{payroll, payslip},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/payroll")
                    // the batch trigger is the one endpoint worth throttling
                    .service(
                        web::resource("/run")
                            .wrap(build_limiter(config.rate_run_per_min))
                            .route(web::post().to(payroll::run_payroll)),
                    )
                    .service(web::resource("/runs").route(web::get().to(payroll::list_runs)))
                    .service(
                        web::resource("/runs/{period}").route(web::get().to(payroll::get_run)),
                    )
                    .service(web::resource("/tax").route(web::get().to(payroll::tax_preview)))
                    .service(web::resource("/export").route(web::get().to(payroll::export_bank)))
                    .service(
                        web::resource("/config")
                            .route(web::get().to(payroll::get_config))
                            .route(web::put().to(payroll::update_config)),
                    ),
            )
            .service(
                web::scope("/payslips")
                    // /payslips
                    .service(web::resource("").route(web::get().to(payslip::list_payslips)))
                    // /payslips/{employee_id}/{period}
                    .service(
                        web::resource("/{employee_id}/{period}")
                            .route(web::get().to(payslip::get_payslip)),
                    ),
            ),
    );
}
