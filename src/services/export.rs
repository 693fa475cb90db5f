//! Выгрузка подтверждённого билета в одностраничный документ
//! фиксированной разметки.

use tracing::error;

use crate::error::ClientError;
use crate::services::ticket::{ConfirmedTicket, TicketView};

/// Страница A4, портрет, миллиметры.
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const PAGE_MARGIN_MM: f64 = 12.0;

const FILE_NAME_PREFIX: &str = "CinemaS-Ticket-";

/// Растровое изображение, полученное от рендерера.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width_px: u32,
    pub height_px: u32,
    /// PNG-данные.
    pub data: Vec<u8>,
}

/// Внешний коллаборатор: отрисовывает закадровый макет подтверждённого
/// билета в растровое изображение. Макет неоплаченного билета сюда не
/// попадает никогда.
pub trait TicketRenderer: Send + Sync {
    fn render(
        &self,
        ticket: &ConfirmedTicket,
    ) -> Result<RenderedImage, Box<dyn std::error::Error + Send + Sync>>;
}

/// Положение изображения на странице, в миллиметрах.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Одностраничный документ билета, готовый к сохранению.
#[derive(Debug, Clone)]
pub struct TicketDocument {
    pub file_name: String,
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub placement: ImagePlacement,
    pub image: RenderedImage,
}

/// Раскладка изображения на странице: ширина подгоняется под рабочую
/// область, по горизонтали поля равные; по вертикали - центр, если
/// изображение короче страницы, иначе прижато к верхнему полю.
pub fn place_on_page(width_px: u32, height_px: u32) -> ImagePlacement {
    let usable_width = PAGE_WIDTH_MM - PAGE_MARGIN_MM * 2.0;
    let height_mm = height_px as f64 * usable_width / width_px as f64;
    let y_mm = if height_mm < PAGE_HEIGHT_MM {
        (PAGE_HEIGHT_MM - height_mm) / 2.0
    } else {
        PAGE_MARGIN_MM
    };

    ImagePlacement {
        x_mm: PAGE_MARGIN_MM,
        y_mm,
        width_mm: usable_width,
        height_mm,
    }
}

/// Выгружает подтверждённый билет в документ фиксированной разметки.
///
/// Для неоплаченного билета операция не поддерживается и отклоняется до
/// обращения к рендереру. Неудача выгрузки сообщается пользователю и не
/// меняет состояние показа билета.
pub fn export_ticket(
    view: &TicketView,
    renderer: &dyn TicketRenderer,
) -> Result<TicketDocument, ClientError> {
    let TicketView::Confirmed(ticket) = view else {
        return Err(ClientError::ExportFailed(
            "ticket is still pending payment".to_string(),
        ));
    };

    let image = renderer.render(ticket).map_err(|e| {
        error!("Ticket rendering failed: {}", e);
        ClientError::ExportFailed(e.to_string())
    })?;

    if image.width_px == 0 || image.height_px == 0 {
        return Err(ClientError::ExportFailed(
            "renderer returned an empty image".to_string(),
        ));
    }

    let placement = place_on_page(image.width_px, image.height_px);

    Ok(TicketDocument {
        file_name: format!("{}{}.pdf", FILE_NAME_PREFIX, ticket.short_id),
        page_width_mm: PAGE_WIDTH_MM,
        page_height_mm: PAGE_HEIGHT_MM,
        placement,
        image,
    })
}
