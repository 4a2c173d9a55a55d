use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{FixedWinnerItem, FixedWinners, Picture, Separate};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::person::list_persons,
        handlers::person::import_persons,
        handlers::person::get_person,
        handlers::person::delete_person,
        handlers::person::delete_all_persons,
        handlers::person::reset_wins,
        handlers::prize::list_prizes,
        handlers::prize::create_prize,
        handlers::prize::get_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::prize::reset_prize,
        handlers::draw::draw,
        handlers::draw::preview,
        handlers::admin::reset_counts,
        handlers::admin::reset_all,
    ),
    components(
        schemas(
            ImportPersonItem,
            ImportPersonsRequest,
            PersonQuery,
            PersonResponse,
            PersonWinResponse,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            SeparateCountInput,
            BatchInput,
            PrizeResponse,
            Picture,
            Separate,
            FixedWinners,
            FixedWinnerItem,
            DrawRequest,
            DrawResultResponse,
            DrawWinnerResponse,
            ResetResponse,
        )
    ),
    tags(
        (name = "person", description = "人员管理"),
        (name = "prize", description = "奖项配置"),
        (name = "draw", description = "抽奖"),
        (name = "admin", description = "数据重置")
    ),
    info(
        title = "Lottery Backend API",
        version = "0.1.0",
        description = "Prize drawing engine REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
