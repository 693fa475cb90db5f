//! Сводка заказа: проверка транзитного состояния бронирования, расчёт
//! сервисного сбора и сборка запроса на создание заказа.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::client::{CreateOrderRequest, OrderSeatData};
use crate::error::ClientError;
use crate::models::seat::{split_seat_code, SelectedSeat};

/// Процент сервисного сбора.
pub const SERVICE_CHARGE_PERCENT: u32 = 6;

/// Транзитное состояние бронирования.
///
/// Живёт только между выбором мест и созданием заказа и передаётся между
/// этапами по значению - никуда не сохраняется, чтобы протухший выбор
/// не был использован повторно.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBookingContext {
    pub show_id: String,
    pub movie_name: String,
    pub date: String,
    pub start_time: String,
    pub seats: Vec<SelectedSeat>,
    /// Сумма по выбранным местам до сервисного сбора.
    pub subtotal: i64,
    /// Куда вернуть пользователя при отмене.
    pub return_path: Option<String>,
}

/// Сервисный сбор: стандартное округление до целой денежной единицы.
pub fn service_charge(subtotal: i64) -> i64 {
    (subtotal as f64 * SERVICE_CHARGE_PERCENT as f64 / 100.0).round() as i64
}

/// Проверенный контекст бронирования с посчитанными суммами.
///
/// Суммы здесь предварительные, для показа до создания заказа; после
/// создания авторитетен `totalPrice` сервера.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    context: PendingBookingContext,
    pub service_charge: i64,
    pub total: i64,
}

impl OrderSummary {
    /// Строит сводку из транзитного состояния.
    ///
    /// Отсутствующий или неполный контекст - ошибка валидации: вызывающий
    /// возвращает пользователя к выбору мест, сводка не показывается.
    pub fn from_context(context: Option<PendingBookingContext>) -> Result<Self, ClientError> {
        let context = context
            .ok_or_else(|| ClientError::Validation("booking context is missing".to_string()))?;

        if context.show_id.is_empty() {
            return Err(ClientError::Validation(
                "booking context has no show id".to_string(),
            ));
        }
        if context.seats.is_empty() {
            return Err(ClientError::Validation(
                "booking context has no seats".to_string(),
            ));
        }
        if context.subtotal < 0 {
            return Err(ClientError::Validation(
                "booking context has a negative subtotal".to_string(),
            ));
        }

        // Каждый код места в выборе должен быть уникален
        let mut seen = HashSet::new();
        for seat in &context.seats {
            if !seen.insert(seat.seat_code.as_str()) {
                return Err(ClientError::Validation(format!(
                    "duplicate seat code '{}'",
                    seat.seat_code
                )));
            }
        }

        let service_charge = service_charge(context.subtotal);
        let total = context.subtotal + service_charge;

        debug!(
            "Order summary: subtotal={}, charge={}, total={}",
            context.subtotal, service_charge, total
        );

        Ok(Self {
            context,
            service_charge,
            total,
        })
    }

    pub fn show_id(&self) -> &str {
        &self.context.show_id
    }

    pub fn movie_name(&self) -> &str {
        &self.context.movie_name
    }

    pub fn date(&self) -> &str {
        &self.context.date
    }

    pub fn start_time(&self) -> &str {
        &self.context.start_time
    }

    pub fn subtotal(&self) -> i64 {
        self.context.subtotal
    }

    pub fn return_path(&self) -> Option<&str> {
        self.context.return_path.as_deref()
    }

    /// Метка мест для показа: "A1, A2".
    pub fn seats_label(&self) -> String {
        self.context
            .seats
            .iter()
            .map(|seat| seat.seat_code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Собирает тело запроса POST /orders, раскладывая каждый код места
    /// на ряд и номер.
    pub fn order_request(&self) -> Result<CreateOrderRequest, ClientError> {
        let seats = self
            .context
            .seats
            .iter()
            .map(|seat| {
                let (row, column) = split_seat_code(&seat.seat_code)?;
                Ok(crate::models::SeatPosition {
                    row,
                    column,
                    layout_type: seat.layout_type.clone(),
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(CreateOrderRequest {
            showtime_id: self.context.show_id.clone(),
            seat_data: OrderSeatData { seats },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn context(seats: Vec<SelectedSeat>, subtotal: i64) -> PendingBookingContext {
        PendingBookingContext {
            show_id: "show-1".to_string(),
            movie_name: "Interstellar".to_string(),
            date: "7 Aug 2026".to_string(),
            start_time: "19:30".to_string(),
            seats,
            subtotal,
            return_path: None,
        }
    }

    fn seats() -> Vec<SelectedSeat> {
        vec![
            SelectedSeat::new("A1", "premium"),
            SelectedSeat::new("A2", "premium"),
        ]
    }

    #[test]
    fn charge_and_total_for_round_subtotal() {
        let summary = OrderSummary::from_context(Some(context(seats(), 1000))).unwrap();
        assert_eq!(summary.service_charge, 60);
        assert_eq!(summary.total, 1060);
    }

    #[test]
    fn charge_rounds_to_nearest_unit() {
        // 999 * 0.06 = 59.94 -> 60
        let summary = OrderSummary::from_context(Some(context(seats(), 999))).unwrap();
        assert_eq!(summary.service_charge, 60);
        assert_eq!(summary.total, 1059);
    }

    #[test]
    fn zero_subtotal_has_zero_charge() {
        let summary = OrderSummary::from_context(Some(context(seats(), 0))).unwrap();
        assert_eq!(summary.service_charge, 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn missing_context_is_a_validation_error() {
        assert!(matches!(
            OrderSummary::from_context(None),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn missing_show_id_is_a_validation_error() {
        let mut ctx = context(seats(), 500);
        ctx.show_id.clear();
        assert!(matches!(
            OrderSummary::from_context(Some(ctx)),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn empty_seat_selection_is_a_validation_error() {
        assert!(matches!(
            OrderSummary::from_context(Some(context(vec![], 500))),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn duplicate_seats_are_a_validation_error() {
        let seats = vec![
            SelectedSeat::new("A1", "premium"),
            SelectedSeat::new("A1", "premium"),
        ];
        assert!(matches!(
            OrderSummary::from_context(Some(context(seats, 500))),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn seats_label_keeps_selection_order() {
        let summary = OrderSummary::from_context(Some(context(seats(), 500))).unwrap();
        assert_eq!(summary.seats_label(), "A1, A2");
    }

    #[test]
    fn order_request_decomposes_seat_codes() {
        let summary = OrderSummary::from_context(Some(context(seats(), 500))).unwrap();
        let request = summary.order_request().unwrap();

        assert_eq!(request.showtime_id, "show-1");
        assert_eq!(request.seat_data.seats.len(), 2);
        assert_eq!(request.seat_data.seats[0].row, "A");
        assert_eq!(request.seat_data.seats[0].column, 1);
        assert_eq!(request.seat_data.seats[1].column, 2);
        assert_eq!(request.seat_data.seats[0].layout_type, "premium");
    }

    #[test]
    fn malformed_seat_code_fails_request_building() {
        let seats = vec![SelectedSeat::new("12", "regular")];
        let summary = OrderSummary::from_context(Some(context(seats, 500))).unwrap();
        assert!(matches!(
            summary.order_request(),
            Err(ClientError::Validation(_))
        ));
    }

    proptest! {
        // total = subtotal + charge, а сбор равен 6% с точностью округления
        #[test]
        fn charge_is_six_percent_rounded(subtotal in 0i64..=1_000_000_000) {
            let charge = service_charge(subtotal);
            prop_assert!((charge * 100 - subtotal * 6).abs() <= 50);

            let summary = OrderSummary::from_context(Some(context(seats(), subtotal))).unwrap();
            prop_assert_eq!(summary.service_charge, charge);
            prop_assert_eq!(summary.total, subtotal + charge);
        }
    }
}
