//! Quotation task types

use crate::enums::{ContentType, DeliveryStatus, MessageDirection, QuotationTaskStatus};
use crate::log::SystemLog;
use crate::{TaskId, Timestamp};
use serde::{Deserialize, Serialize};

/// Row returned by the task list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationTaskSummary {
    pub id: TaskId,
    #[serde(rename = "id_pedido_cotacao_original")]
    pub original_request_id: String,
    #[serde(rename = "nome_fornecedor")]
    pub supplier_name: String,
    #[serde(rename = "telefone_fornecedor")]
    pub supplier_phone: String,
    #[serde(rename = "marca_veiculo")]
    pub vehicle_make: String,
    #[serde(rename = "modelo_veiculo")]
    pub vehicle_model: String,
    #[serde(rename = "ano_veiculo")]
    pub vehicle_year: i32,
    #[serde(rename = "chassi_veiculo")]
    pub vehicle_chassis: String,
    pub status: QuotationTaskStatus,
    pub next_action_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// Full task record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationTask {
    pub id: TaskId,
    #[serde(rename = "id_pedido_cotacao_original")]
    pub original_request_id: String,
    #[serde(rename = "nome_fornecedor")]
    pub supplier_name: String,
    #[serde(rename = "telefone_fornecedor")]
    pub supplier_phone: String,
    #[serde(rename = "url_unica_fornecedor")]
    pub supplier_url: String,
    #[serde(rename = "marca_veiculo")]
    pub vehicle_make: String,
    #[serde(rename = "modelo_veiculo")]
    pub vehicle_model: String,
    #[serde(rename = "ano_veiculo")]
    pub vehicle_year: i32,
    #[serde(rename = "chassi_veiculo")]
    pub vehicle_chassis: String,
    pub status: QuotationTaskStatus,
    pub retry_attempts: u32,
    pub last_contact_attempt_at: Option<Timestamp>,
    pub next_action_at: Option<Timestamp>,
    pub supplier_response_content: Option<String>,
    /// Model-generated reading of the supplier's response.
    #[serde(rename = "gemini_interpretation_of_response")]
    pub response_interpretation: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Original request payload, kept opaque.
    #[serde(rename = "received_input_payload", default)]
    pub request_payload: serde_json::Value,
    #[serde(rename = "parts_list", default)]
    pub parts: Vec<QuotationPart>,
    #[serde(rename = "message_history", default)]
    pub messages: Vec<QuotationMessage>,
    #[serde(rename = "system_logs", default)]
    pub logs: Vec<SystemLog>,
}

impl QuotationTask {
    pub fn summary(&self) -> QuotationTaskSummary {
        QuotationTaskSummary {
            id: self.id.clone(),
            original_request_id: self.original_request_id.clone(),
            supplier_name: self.supplier_name.clone(),
            supplier_phone: self.supplier_phone.clone(),
            vehicle_make: self.vehicle_make.clone(),
            vehicle_model: self.vehicle_model.clone(),
            vehicle_year: self.vehicle_year,
            vehicle_chassis: self.vehicle_chassis.clone(),
            status: self.status,
            next_action_at: self.next_action_at,
            updated_at: self.updated_at,
        }
    }

    /// `"<make> <model> (<year>)"`
    pub fn vehicle_label(&self) -> String {
        format!("{} {} ({})", self.vehicle_make, self.vehicle_model, self.vehicle_year)
    }
}

impl QuotationTaskSummary {
    pub fn vehicle_label(&self) -> String {
        format!("{} {} ({})", self.vehicle_make, self.vehicle_model, self.vehicle_year)
    }
}

/// Requested part line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationPart {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

/// One message exchanged with the supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationMessage {
    pub timestamp: Timestamp,
    pub direction: MessageDirection,
    pub content: String,
    pub content_type: ContentType,
    #[serde(rename = "evolution_message_id")]
    pub external_message_id: String,
    #[serde(rename = "evolution_status")]
    pub delivery_status: DeliveryStatus,
}
