//! `POST /graphql` 与可选的 GraphiQL 页面

use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, warn};

use crate::api::graphql::{AppSchema, ClientKey, Viewer};
use crate::api::jwt::JwtService;
use crate::services::AppServices;
use crate::utils::extract_client_ip;

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 根据 bearer token 解析调用者；无效 token 或已删除的用户按匿名处理
async fn resolve_viewer(req: &HttpRequest, jwt: &JwtService, services: &AppServices) -> Viewer {
    let Some(token) = bearer_token(req) else {
        return Viewer::anonymous();
    };

    let claims = match jwt.validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Ignoring invalid bearer token: {}", e);
            return Viewer::anonymous();
        }
    };

    // 以数据库中的当前角色为准
    match services.users.get(&claims.sub).await {
        Ok(user) => Viewer::authenticated(user),
        Err(e) => {
            warn!("Token subject {} not usable: {}", claims.sub, e);
            Viewer::anonymous()
        }
    }
}

pub async fn graphql_handler(
    schema: web::Data<AppSchema>,
    jwt: web::Data<JwtService>,
    services: web::Data<AppServices>,
    http_req: HttpRequest,
    gql_req: GraphQLRequest,
) -> GraphQLResponse {
    let viewer = resolve_viewer(&http_req, &jwt, &services).await;
    let client = ClientKey::from_ip(extract_client_ip(&http_req));

    let request = gql_req.into_inner().data(viewer).data(client);
    schema.execute(request).await.into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// GraphQL 路由 `/graphql`
pub fn graphql_routes(enable_playground: bool) -> actix_web::Resource {
    let resource = web::resource("/graphql").route(web::post().to(graphql_handler));
    if enable_playground {
        resource.route(web::get().to(graphiql))
    } else {
        resource
    }
}
