// ==========================================
// 矿石配矿系统 - 批次与化学成分
// ==========================================
// 职责: 批次 (Lot) 输入记录与四项化学成分值对象
// 红线: 批次在配矿计算期间只读
// ==========================================

use crate::domain::types::{round_to, ChemParam, ProductSize};
use serde::{Deserialize, Serialize};

// ==========================================
// Chemistry - 四项化学成分 (%)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chemistry {
    pub fe: f64,
    pub sio2: f64,
    pub al2o3: f64,
    pub p: f64,
}

impl Chemistry {
    pub fn new(fe: f64, sio2: f64, al2o3: f64, p: f64) -> Self {
        Self { fe, sio2, al2o3, p }
    }

    /// 按指标取值
    pub fn get(&self, param: ChemParam) -> f64 {
        match param {
            ChemParam::Fe => self.fe,
            ChemParam::SiO2 => self.sio2,
            ChemParam::Al2O3 => self.al2o3,
            ChemParam::P => self.p,
        }
    }

    /// 乘以吨位，得到加权贡献量
    pub fn scaled(&self, tonnage_t: f64) -> Chemistry {
        Chemistry {
            fe: self.fe * tonnage_t,
            sio2: self.sio2 * tonnage_t,
            al2o3: self.al2o3 * tonnage_t,
            p: self.p * tonnage_t,
        }
    }

    /// 逐项相加
    pub fn plus(&self, other: &Chemistry) -> Chemistry {
        Chemistry {
            fe: self.fe + other.fe,
            sio2: self.sio2 + other.sio2,
            al2o3: self.al2o3 + other.al2o3,
            p: self.p + other.p,
        }
    }

    /// 加权和 / 吨位 → 加权平均百分比
    pub fn divided(&self, tonnage_t: f64) -> Chemistry {
        Chemistry {
            fe: self.fe / tonnage_t,
            sio2: self.sio2 / tonnage_t,
            al2o3: self.al2o3 / tonnage_t,
            p: self.p / tonnage_t,
        }
    }

    /// 按声明精度取整（Fe/SiO2 3 位, Al2O3/P 4 位）
    pub fn rounded(&self) -> Chemistry {
        Chemistry {
            fe: round_to(self.fe, ChemParam::Fe.precision()),
            sio2: round_to(self.sio2, ChemParam::SiO2.precision()),
            al2o3: round_to(self.al2o3, ChemParam::Al2O3.precision()),
            p: round_to(self.p, ChemParam::P.precision()),
        }
    }
}

// ==========================================
// LotSpecOverride - 批次内嵌规格
// ==========================================
// 显式可选: None 表示缺省，由规格解析器统一回退
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LotSpecOverride {
    pub fe_spec_min: Option<f64>,
    pub sio2_spec_max: Option<f64>,
}

impl LotSpecOverride {
    pub fn is_empty(&self) -> bool {
        self.fe_spec_min.is_none() && self.sio2_spec_max.is_none()
    }
}

// ==========================================
// Lot - 批次（矿样）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub lot_id: String,
    pub tonnage_t: f64,
    pub chemistry: Chemistry,
    #[serde(default)]
    pub product_size: ProductSize,
    #[serde(default)]
    pub spec_override: LotSpecOverride,
}

impl Lot {
    /// 构造无内嵌规格的批次
    pub fn new(
        lot_id: impl Into<String>,
        tonnage_t: f64,
        chemistry: Chemistry,
        product_size: ProductSize,
    ) -> Self {
        Self {
            lot_id: lot_id.into(),
            tonnage_t,
            chemistry,
            product_size,
            spec_override: LotSpecOverride::default(),
        }
    }

    /// 附加批次内嵌规格
    pub fn with_spec_override(mut self, spec_override: LotSpecOverride) -> Self {
        self.spec_override = spec_override;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chemistry_scaled_and_divided() {
        let chem = Chemistry::new(65.0, 2.0, 0.5, 0.02);
        let contrib = chem.scaled(6000.0);
        assert_eq!(contrib.fe, 390_000.0);
        assert_eq!(contrib.sio2, 12_000.0);

        let back = contrib.divided(6000.0);
        assert!((back.al2o3 - 0.5).abs() < 1e-12);
        assert!((back.p - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_chemistry_rounded_precision() {
        let chem = Chemistry::new(62.23456, 4.40049, 1.234567, 0.056789);
        let r = chem.rounded();
        assert_eq!(r.fe, 62.235);
        assert_eq!(r.sio2, 4.4);
        assert_eq!(r.al2o3, 1.2346);
        assert_eq!(r.p, 0.0568);
    }

    #[test]
    fn test_lot_deserialize_defaults() {
        let json = r#"{"lot_id":"L1","tonnage_t":1000.0,
            "chemistry":{"fe":60.0,"sio2":4.0,"al2o3":1.0,"p":0.03}}"#;
        let lot: Lot = serde_json::from_str(json).unwrap();
        assert_eq!(lot.product_size, ProductSize::Lump10To40);
        assert!(lot.spec_override.is_empty());
    }
}
