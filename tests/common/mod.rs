#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tributario_backend::{
    config::{AppState, Config},
    create_router,
    models::auth::{RegisterUserPayload, RoleType, User},
};

pub const SENHA: &str = "senha123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_app() -> TestApp {
    let state = AppState::in_memory(Config::for_tests());
    TestApp { router: create_router(state.clone()), state }
}

impl TestApp {
    pub async fn create_user(&self, email: &str, role: RoleType) -> User {
        let payload = RegisterUserPayload {
            nome: "Usuário de Teste".into(),
            email: email.into(),
            senha: Some(SENHA.into()),
            role,
        };
        self.state.auth_service.register_user(&payload).await.unwrap().user
    }

    /// Token de um usuário recém-criado com o perfil pedido.
    pub async fn token(&self, role: RoleType) -> String {
        let email = format!("{}@escritorio.com.br", uuid::Uuid::new_v4());
        let user = self.create_user(&email, role).await;
        self.state.auth_service.create_token(&user).unwrap()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call(request).await
    }

    /// Envia uma requisição montada à mão (cabeçalhos fora do padrão).
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }
}

/// Sobe o router numa porta efêmera e devolve a URL base.
pub async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}
