use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::seat::SeatPosition;

/// Статус заказа на стороне сервера.
///
/// Бэкенд может хранить и другие терминальные статусы; всё, что не
/// PENDING, клиент показывает как подтверждённый билет, но исходная
/// строка статуса при этом сохраняется.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(untagged)]
    Other(String),
}

impl OrderStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenRef {
    #[serde(rename = "theaterName")]
    pub theater_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    pub movie: MovieRef,
    pub screen: ScreenRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatData {
    pub seats: Vec<SeatPosition>,
}

/// Заказ - авторитетная сущность бэкенда, клиент читает её как есть.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub showtime: Showtime,
    #[serde(rename = "seatData")]
    pub seat_data: SeatData,
    /// Итог, посчитанный сервером. После создания заказа авторитетен
    /// именно он, а не клиентская оценка.
    #[serde(rename = "totalPrice")]
    pub total_price: i64,
    /// Используется только при сверке оплаты (выбор новейшего заказа).
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_preserved() {
        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, OrderStatus::Other("CANCELLED".to_string()));
        assert!(!status.is_pending());
    }

    #[test]
    fn order_deserializes_from_api_shape() {
        let raw = r#"{
            "id": "b2f1c7a4-9d1e-4f0b-8a36-5f2f4f8f9c11",
            "status": "PENDING",
            "showtime": {
                "startTime": "2026-08-07T19:30:00Z",
                "movie": { "name": "Interstellar" },
                "screen": { "theaterName": "CinemaS Central" }
            },
            "seatData": { "seats": [ { "row": "A", "column": 1, "layoutType": "premium" } ] },
            "totalPrice": 530,
            "createdAt": "2026-08-07T19:01:12Z"
        }"#;

        let order: Order = serde_json::from_str(raw).unwrap();
        assert!(order.status.is_pending());
        assert_eq!(order.showtime.movie.name, "Interstellar");
        assert_eq!(order.seat_data.seats[0].row, "A");
        assert_eq!(order.total_price, 530);
    }
}
