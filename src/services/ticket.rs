//! Представление заказа в виде билета.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::client::CinemaApiClient;
use crate::error::ClientError;
use crate::models::{Order, OrderStatus};

/// Источник билета: уже загруженный заказ либо его идентификатор.
pub enum TicketSource {
    Order(Order),
    Id(String),
}

/// Готовая к показу модель билета.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketView {
    /// Оплата ещё не подтверждена: детали сеанса и мест не показываются,
    /// идентификатор усечён.
    Pending { movie_name: String, short_id: String },
    Confirmed(ConfirmedTicket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTicket {
    pub movie_name: String,
    pub theater_name: String,
    /// "Thu"
    pub weekday: String,
    /// "7 Aug 2026"
    pub date: String,
    /// Время начала, 24-часовой формат: "19:30".
    pub time: String,
    /// "A1, A2" - места в исходном порядке заказа.
    pub seats: String,
    pub seat_count: usize,
    pub total_price: i64,
    pub short_id: String,
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn format_date(at: DateTime<Utc>) -> String {
    // день без ведущего нуля: "7 Aug 2026"
    at.format("%-d %b %Y").to_string()
}

impl TicketView {
    /// Чистая проекция заказа в модель показа: один и тот же заказ
    /// всегда даёт одни и те же поля.
    pub fn from_order(order: &Order) -> Self {
        if order.status.is_pending() {
            return TicketView::Pending {
                movie_name: order.showtime.movie.name.clone(),
                short_id: short_id(&order.id),
            };
        }

        if let OrderStatus::Other(status) = &order.status {
            warn!(
                "Order {} has status '{}', presenting as confirmed",
                order.id, status
            );
        }

        let start = order.showtime.start_time;
        let seats: Vec<String> = order
            .seat_data
            .seats
            .iter()
            .map(|seat| format!("{}{}", seat.row, seat.column))
            .collect();

        TicketView::Confirmed(ConfirmedTicket {
            movie_name: order.showtime.movie.name.clone(),
            theater_name: order.showtime.screen.theater_name.clone(),
            weekday: start.format("%a").to_string(),
            date: format_date(start),
            time: start.format("%H:%M").to_string(),
            seat_count: seats.len(),
            seats: seats.join(", "),
            total_price: order.total_price,
            short_id: short_id(&order.id),
        })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TicketView::Pending { .. })
    }
}

pub struct TicketPresenter<'a> {
    api: &'a CinemaApiClient,
}

impl<'a> TicketPresenter<'a> {
    pub fn new(api: &'a CinemaApiClient) -> Self {
        Self { api }
    }

    /// Разрешает источник в модель билета.
    ///
    /// 401 при загрузке списка - это не «билет не найден»: ошибка уходит
    /// наверх глобальному обработчику и с `NotFound` не смешивается.
    /// `NotFound` возникает только когда список загрузился, а заказа с
    /// таким идентификатором в нём нет.
    pub async fn resolve(&self, source: TicketSource) -> Result<TicketView, ClientError> {
        let order = match source {
            TicketSource::Order(order) => order,
            TicketSource::Id(order_id) => {
                let orders = self.api.fetch_orders().await?;
                orders
                    .into_iter()
                    .find(|order| order.id == order_id)
                    .ok_or(ClientError::NotFound)?
            }
        };

        Ok(TicketView::from_order(&order))
    }
}
