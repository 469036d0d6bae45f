//! Identificação do veículo exibida na barra superior.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleInfo {
    pub brand: String,
    pub model: String,
    pub year: u16,
    /// Computador de bordo (ex: "Raspberry Pi 5")
    pub board: String,
}

impl Default for VehicleInfo {
    fn default() -> Self {
        Self {
            brand: "ULGEN".into(),
            model: "AI-Driven Explorer".into(),
            year: 2025,
            board: "Raspberry Pi 5".into(),
        }
    }
}

impl VehicleInfo {
    /// Campos na ordem marca, modelo, ano.
    pub fn fields(&self) -> Vec<String> {
        vec![self.brand.clone(), self.model.clone(), self.year.to_string()]
    }

    /// Linha de sistema: "Raspberry Pi 5 • Linux".
    pub fn system_line(&self, platform_name: &str) -> String {
        if self.board.is_empty() {
            platform_name.to_string()
        } else {
            format!("{} • {}", self.board, platform_name)
        }
    }
}

impl fmt::Display for VehicleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Brand: {}, Model: {}, Year: {}", self.brand, self.model, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_fields() {
        let v = VehicleInfo {
            brand: "Toyota".into(),
            model: "Corolla".into(),
            year: 2020,
            board: String::new(),
        };
        assert_eq!(v.to_string(), "Brand: Toyota, Model: Corolla, Year: 2020");
        assert_eq!(v.fields(), vec!["Toyota", "Corolla", "2020"]);
        assert_eq!(v.system_line("Linux"), "Linux");
    }

    #[test]
    fn system_line_with_board() {
        assert_eq!(VehicleInfo::default().system_line("Windows"), "Raspberry Pi 5 • Windows");
    }
}
