//! Создание заказа и передача управления платёжному провайдеру.

use tracing::{error, info};

use crate::client::CinemaApiClient;
use crate::error::ClientError;
use crate::services::summary::OrderSummary;

/// Внешний коллаборатор: полный переход браузера на страницу оплаты.
///
/// После вызова клиент считает своё состояние потерянным: всё
/// послеплатёжное восстанавливается заново из бэкенда.
pub trait PaymentRedirect: Send + Sync {
    fn redirect_to(&self, url: &str);
}

/// Результат успешного создания заказа.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: String,
    pub payment_url: String,
}

pub struct OrderGateway<'a> {
    api: &'a CinemaApiClient,
    redirect: &'a dyn PaymentRedirect,
}

impl<'a> OrderGateway<'a> {
    pub fn new(api: &'a CinemaApiClient, redirect: &'a dyn PaymentRedirect) -> Self {
        Self { api, redirect }
    }

    /// Создаёт заказ и уводит пользователя на страницу оплаты.
    ///
    /// Сводка поглощается: транзитное состояние бронирования намеренно
    /// не переживает редирект. Без токена операция обрывается до сети;
    /// при ошибке создания локально ничего не кешируется, автоматических
    /// повторов нет. Отмена до создания заказа не требует очистки -
    /// заказа ещё не существует.
    pub async fn place_order(&self, summary: OrderSummary) -> Result<PlacedOrder, ClientError> {
        let request = summary.order_request()?;

        let response = self.api.create_order(&request).await?;

        let Some(payment_url) = response.payment_url else {
            error!("Order {} created without payment url", response.order_id);
            return Err(ClientError::OrderCreationFailed(
                response
                    .message
                    .unwrap_or_else(|| "payment initiation failed".to_string()),
            ));
        };

        info!(
            "Order {} created, handing off to payment page",
            response.order_id
        );
        self.redirect.redirect_to(&payment_url);

        Ok(PlacedOrder {
            order_id: response.order_id,
            payment_url,
        })
    }
}
