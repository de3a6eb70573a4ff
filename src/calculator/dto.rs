use serde::{Deserialize, Serialize};

use super::services::{Number, Operation};

/// Body of the per-operation endpoints (`/add`, `/divide`, ...).
#[derive(Debug, Deserialize)]
pub struct CalculationRequest {
    pub a: Number,
    pub b: Number,
}

/// Body of `/calculate`, where the operation travels with the operands.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub a: Number,
    pub b: Number,
    pub operation: Operation,
}

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub result: Number,
}
