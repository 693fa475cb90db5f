//! reconcile.rs
//!
//! Этот модуль реализует сверку результата оплаты после возврата
//! пользователя от платёжного провайдера.
//!
//! Подтверждение провайдера может обогнать расчёт по его же вебхуку,
//! поэтому сверка двухъярусная, с явным приоритетом:
//! 1.  **Основной путь**: проверка по сессионному токену провайдера.
//!     Успешный ответ всегда авторитетен и завершает процедуру.
//! 2.  **Резервный путь**: ограниченная по времени попытка найти заказ
//!     в списке пользователя. Окно свежести не даёт выдать чужой старый
//!     заказ за результат текущей оплаты.
//!
//! Сверка только читает: заказы здесь не создаются и не изменяются.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::client::CinemaApiClient;
use crate::error::ClientError;
use crate::models::Order;

/// Окно свежести: заказ из резервного списка можно отнести к текущей
/// оплате, только если он создан меньше пяти минут назад.
pub const FRESHNESS_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Причина неуспеха сверки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// В адресе возврата нет сессионного токена провайдера.
    NoSession,
    /// Ни основной, ни резервный путь не дали подтверждения.
    VerificationFailed,
}

impl FailureReason {
    /// Сообщение для пользователя. Повторная оплата сознательно не
    /// предлагается - двойное списание хуже лишнего перехода в билеты.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureReason::NoSession => {
                "No payment session found. Please check My Tickets to confirm."
            }
            FailureReason::VerificationFailed => {
                "Payment verification failed. Please check My Tickets to confirm."
            }
        }
    }
}

// Для встраивающего кода, которому удобнее единая ошибка клиента
impl From<FailureReason> for ClientError {
    fn from(_: FailureReason) -> Self {
        ClientError::VerificationFailed
    }
}

/// Исход сверки. Ровно одно из трёх состояний, частичного применения нет.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Оплата сопоставлена с заказом.
    Confirmed { order_id: String },
    /// Сервер ответил 401: исходом владеет глобальный обработчик сессии,
    /// компонент сам ни подтверждает оплату, ни объявляет провал.
    Deferred,
    Failed(FailureReason),
}

pub struct PaymentReconciler<'a> {
    api: &'a CinemaApiClient,
}

impl<'a> PaymentReconciler<'a> {
    pub fn new(api: &'a CinemaApiClient) -> Self {
        Self { api }
    }

    /// Разрешает сессионный токен провайдера в подтверждённый заказ.
    ///
    /// Порядок строгий, выигрывает первый успех:
    /// 1. нет токена -> `Failed(NoSession)`;
    /// 2. основной путь; успех авторитетен, резервный путь при этом не
    ///    выполняется вовсе;
    /// 3. 401 на любом пути -> `Deferred` (сигнал уже поднят клиентским
    ///    слоем);
    /// 4. иначе резервный путь: новейший заказ пользователя в пределах
    ///    окна свежести;
    /// 5. всё мимо -> `Failed(VerificationFailed)`.
    pub async fn resolve(&self, session_id: Option<&str>) -> Reconciliation {
        let Some(session_id) = session_id else {
            warn!("Returned from payment provider without a session id");
            return Reconciliation::Failed(FailureReason::NoSession);
        };

        // Основной путь. Резервный не начинается, пока этот вызов не
        // завершился неуспехом окончательно.
        match self.api.verify_payment(session_id).await {
            Ok(verified) => {
                info!("Payment verified: order_id={}", verified.order_id);
                return Reconciliation::Confirmed {
                    order_id: verified.order_id,
                };
            }
            Err(ClientError::Unauthenticated) => {
                return Reconciliation::Deferred;
            }
            Err(e) => {
                warn!("Primary verification failed, checking recent orders: {}", e);
            }
        }

        // Резервный путь: вебхук провайдера мог ещё не дойти, но заказ
        // уже виден в списке пользователя.
        match self.api.fetch_orders().await {
            Ok(orders) => {
                if let Some(order) = select_recent_order(&orders, Utc::now()) {
                    info!("Payment confirmed via recent orders: order_id={}", order.id);
                    return Reconciliation::Confirmed {
                        order_id: order.id.clone(),
                    };
                }
            }
            Err(ClientError::Unauthenticated) => {
                return Reconciliation::Deferred;
            }
            Err(e) => {
                warn!("Fallback order fetch failed: {}", e);
            }
        }

        Reconciliation::Failed(FailureReason::VerificationFailed)
    }
}

/// Выбирает заказ, который можно отнести к только что завершённой оплате:
/// новейший по `createdAt` (при равенстве - в порядке ответа сервера) и
/// строго моложе окна свежести. Более старый заказ не подставляется
/// никогда, даже если он самый свежий в списке.
pub fn select_recent_order(orders: &[Order], now: DateTime<Utc>) -> Option<&Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    // сортировка стабильная: новые сначала, ровесники в исходном порядке
    sorted.sort_by_key(|order| std::cmp::Reverse(order.created_at));

    let latest = *sorted.first()?;
    let age = now.signed_duration_since(latest.created_at);
    if age < Duration::milliseconds(FRESHNESS_WINDOW_MS) {
        Some(latest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{MovieRef, OrderStatus, ScreenRef, SeatData, Showtime};

    fn order(id: &str, created_at: DateTime<Utc>) -> Order {
        Order {
            id: id.to_string(),
            status: OrderStatus::Confirmed,
            showtime: Showtime {
                start_time: created_at,
                movie: MovieRef {
                    name: "Interstellar".to_string(),
                },
                screen: ScreenRef {
                    theater_name: "CinemaS Central".to_string(),
                },
            },
            seat_data: SeatData { seats: vec![] },
            total_price: 530,
            created_at,
        }
    }

    #[test]
    fn picks_the_newest_order() {
        let now = Utc::now();
        let orders = vec![
            order("old", now - Duration::minutes(10)),
            order("newest", now - Duration::minutes(1)),
            order("middle", now - Duration::minutes(3)),
        ];

        let picked = select_recent_order(&orders, now).unwrap();
        assert_eq!(picked.id, "newest");
    }

    #[test]
    fn accepts_order_just_inside_the_window() {
        let now = Utc::now();
        let orders = vec![order("fresh", now - Duration::milliseconds(299_999))];
        assert!(select_recent_order(&orders, now).is_some());
    }

    #[test]
    fn rejects_order_just_outside_the_window() {
        let now = Utc::now();
        let orders = vec![order("stale", now - Duration::milliseconds(300_001))];
        assert!(select_recent_order(&orders, now).is_none());
    }

    #[test]
    fn rejects_stale_order_even_when_it_is_the_only_one() {
        let now = Utc::now();
        let orders = vec![order("yesterday", now - Duration::hours(24))];
        assert!(select_recent_order(&orders, now).is_none());
    }

    #[test]
    fn empty_list_yields_nothing() {
        assert!(select_recent_order(&[], Utc::now()).is_none());
    }

    #[test]
    fn failure_messages_point_to_the_ticket_list() {
        assert!(FailureReason::NoSession.user_message().contains("My Tickets"));
        assert!(FailureReason::VerificationFailed
            .user_message()
            .contains("My Tickets"));
    }

    #[test]
    fn ties_keep_server_order() {
        let now = Utc::now();
        let created = now - Duration::minutes(1);
        let orders = vec![order("first", created), order("second", created)];

        let picked = select_recent_order(&orders, now).unwrap();
        assert_eq!(picked.id, "first");
    }
}
