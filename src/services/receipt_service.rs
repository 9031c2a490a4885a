// src/services/receipt_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservationRepository,
    models::auth::User,
    services::billing,
};

// Comprovante de estacionamento em PDF, emitido apenas para reservas
// já encerradas. O QR code carrega o id da reserva, para conferência
// na cancela.
#[derive(Clone)]
pub struct ReceiptService {
    reservation_repo: ReservationRepository,
    pool: PgPool,
}

impl ReceiptService {
    pub fn new(reservation_repo: ReservationRepository, pool: PgPool) -> Self {
        Self { reservation_repo, pool }
    }

    pub async fn generate_receipt_pdf(
        &self,
        user: &User,
        reservation_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados consolidados
        let data = self.reservation_repo
            .find_receipt_data(&self.pool, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if data.user_id != user.id && !user.is_admin() {
            return Err(AppError::NotReservationOwner);
        }

        let leaving_time = data.leaving_time.ok_or(AppError::ReservationStillActive)?;

        // O custo é sempre recalculado dos timestamps (fonte da verdade),
        // nunca lido do valor gravado.
        let total = billing::quote(data.cost_per_hour, data.parking_time, leaving_time);
        let hours = billing::elapsed_hours(data.parking_time, leaving_time).round_dp(2);

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Comprovante de Estacionamento #{}", data.reservation_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(data.lot_name.clone())
            .styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Paragraph::new(format!("{} - {}", data.lot_address, data.lot_city))
            .styled(style::Style::new().with_font_size(10)));

        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new("COMPROVANTE DE ESTACIONAMENTO")
            .styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!("Reserva: {}", data.reservation_id)));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", data.user_full_name)));

        doc.push(elements::Break::new(2));

        // --- TABELA DO PERÍODO ---
        // Pesos das colunas: Rótulo (2), Valor (3)
        let mut table = elements::TableLayout::new(vec![2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();

        let vehicle = data.vehicle_number.clone().unwrap_or_else(|| "Não informado".to_string());
        let rows = [
            ("Vaga", data.spot_name.clone()),
            ("Veículo", vehicle),
            ("Entrada", data.parking_time.format("%d/%m/%Y %H:%M").to_string()),
            ("Saída", leaving_time.format("%d/%m/%Y %H:%M").to_string()),
            ("Horas", format!("{}", hours)),
            ("Tarifa por hora", format!("R$ {:.2}", data.cost_per_hour)),
        ];

        for (label, value) in rows {
            table.row()
                .element(elements::Paragraph::new(label).styled(style_bold))
                .element(elements::Paragraph::new(value))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total_paragraph = elements::Paragraph::new(format!("TOTAL: R$ {:.2}", total));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- QR CODE (id da reserva, para conferência) ---
        let code = QrCode::new(data.reservation_id.to_string().as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
