pub mod admin;
pub mod draw;
pub mod person;
pub mod prize;

pub use admin::admin_config;
pub use draw::draw_config;
pub use person::person_config;
pub use prize::prize_config;

use actix_web::web;

/// 挂载 /api/v1 下的全部路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(person_config)
            .configure(prize_config)
            .configure(draw_config)
            .configure(admin_config),
    );
}
