//! client.rs
//!
//! Этот модуль реализует HTTP-клиент для REST API CinemaS.
//!
//! Ключевые компоненты:
//! 1.  **CinemaApiClient**: основной клиент, инкапсулирующий всю логику
//!     отправки запросов к бэкенду: подстановку bearer-токена,
//!     типизированные модели запросов/ответов и разбор ошибок.
//! 2.  **Обработка 401**: любой ответ 401 поднимает процессный
//!     `UnauthorizedSignal` ровно один раз и превращается в
//!     `ClientError::Unauthenticated` - компоненты выше никогда не
//!     показывают такую ошибку на месте.
//! 3.  **Проверка сессии до сети**: для аутентифицированных вызовов
//!     отсутствие токена обрывает операцию ещё до сетевого запроса.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    config::ApiConfig,
    error::ClientError,
    models::seat::SeatPosition,
    models::{Movie, Order, Theater},
    session::{SessionStore, UnauthorizedSignal},
};

// --- Модели данных API ---

/// Форма входа. Проверяется до обращения к серверу.
#[derive(Debug, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Ответ на вход.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "expireAt")]
    pub expire_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Запрос на создание заказа.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "showtimeId")]
    pub showtime_id: String,
    #[serde(rename = "seatData")]
    pub seat_data: OrderSeatData,
}

#[derive(Debug, Serialize)]
pub struct OrderSeatData {
    pub seats: Vec<SeatPosition>,
}

/// Ответ на создание заказа.
#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Адрес платёжной страницы. Его отсутствие - ошибка создания заказа.
    #[serde(rename = "paymentUrl")]
    pub payment_url: Option<String>,
    pub message: Option<String>,
}

/// Ответ основного пути проверки оплаты.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

// Список кинотеатров приходит в конверте {"data": [...]}
#[derive(Debug, Deserialize)]
struct TheaterListResponse {
    data: Vec<Theater>,
}

// Тело ошибки API; message может отсутствовать
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Клиент REST API CinemaS.
#[derive(Clone)]
pub struct CinemaApiClient {
    /// Базовый URL API, без завершающего слэша.
    base_url: String,
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
    /// Внешнее хранилище токена доступа.
    session: Arc<dyn SessionStore>,
    /// Процессный сигнал о недействительной сессии.
    unauthorized: UnauthorizedSignal,
}

impl CinemaApiClient {
    /// Создаёт и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(
        config: &ApiConfig,
        session: Arc<dyn SessionStore>,
        unauthorized: UnauthorizedSignal,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            session,
            unauthorized,
        }
    }

    /// Токен текущей сессии. Отсутствие токена - `Unauthenticated`
    /// без единого сетевого вызова.
    fn bearer_token(&self) -> Result<String, ClientError> {
        self.session
            .access_token()
            .ok_or(ClientError::Unauthenticated)
    }

    /// Общий разбор статуса ответа: 401 поднимает глобальный сигнал,
    /// прочие неуспешные статусы превращаются в `ClientError::Api`.
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("API responded 401 - raising unauthorized signal");
            self.unauthorized.raise();
            return Err(ClientError::Unauthenticated);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            error!("API error {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// POST /auth/login - вход по email и паролю.
    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ClientError> {
        form.validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        info!("Logging in: email={}", form.email);

        let response = self
            .http_client
            .post(format!("{}/auth/login", self.base_url))
            .json(form)
            .send()
            .await?;

        // Неверные учётные данные на форме логина - это не «протухшая
        // сессия»: глобальный сигнал здесь не поднимается.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Api {
                status: 401,
                message: "Invalid email or password".to_string(),
            });
        }

        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }

    /// GET /movies - список фильмов.
    pub async fn fetch_movies(&self) -> Result<Vec<Movie>, ClientError> {
        let token = self.bearer_token()?;

        let response = self
            .http_client
            .get(format!("{}/movies", self.base_url))
            .bearer_auth(&token)
            .send()
            .await?;

        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }

    /// GET /theaters - список кинотеатров.
    pub async fn fetch_theaters(&self) -> Result<Vec<Theater>, ClientError> {
        let token = self.bearer_token()?;

        let response = self
            .http_client
            .get(format!("{}/theaters", self.base_url))
            .bearer_auth(&token)
            .send()
            .await?;

        let response = self.check_status(response).await?;
        let body: TheaterListResponse = response.json().await?;
        Ok(body.data)
    }

    /// POST /orders - создаёт заказ и возвращает ссылку на оплату.
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        let token = self.bearer_token()?;

        info!(
            "Creating order: showtime_id={}, seats={}",
            request.showtime_id,
            request.seat_data.seats.len()
        );

        let response = self
            .http_client
            .post(format!("{}/orders", self.base_url))
            .bearer_auth(&token)
            .json(request)
            .send()
            .await?;

        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }

    /// GET /payments/verify - основной путь подтверждения оплаты.
    /// Запрос идентифицируется сессионным токеном платёжного провайдера.
    pub async fn verify_payment(
        &self,
        session_id: &str,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        info!("Verifying payment: session_id={}", session_id);

        let response = self
            .http_client
            .get(format!("{}/payments/verify", self.base_url))
            .query(&[("session_id", session_id)])
            .send()
            .await?;

        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }

    /// GET /orders - заказы текущего пользователя. Порядок сервером не
    /// гарантирован, сортирует потребитель.
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ClientError> {
        let token = self.bearer_token()?;

        let response = self
            .http_client
            .get(format!("{}/orders", self.base_url))
            .bearer_auth(&token)
            .send()
            .await?;

        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }
}
