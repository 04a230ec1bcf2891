// ==========================================
// 矿石配矿系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 批次字段映射 + 类型转换
// 列名: 按别名匹配（表头已规范化为小写）
// ==========================================

use crate::domain::lot::{Chemistry, Lot, LotSpecOverride};
use crate::domain::types::{round_to, ProductSize};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::lot_importer_trait::{FieldMapper, RawRecord};

/// 吨位缺失或为 0 时的缺省批次吨位
pub const DEFAULT_LOT_TONNAGE_T: f64 = 1000.0;

const LOT_ID_ALIASES: &[&str] = &["lot id", "lotid", "lot", "sample id", "sampleid", "sample"];
const TONNAGE_ALIASES: &[&str] = &["tonnage", "representative lot qty", "lot qty", "qty"];
pub const FE_ALIASES: &[&str] = &["fe%", "fe"];
const SIO2_ALIASES: &[&str] = &["sio2%", "sio2"];
const AL2O3_ALIASES: &[&str] = &["al2o3%", "al2o3"];
const P_ALIASES: &[&str] = &["p%", "p"];
const FE_SPEC_MIN_ALIASES: &[&str] = &["fe spec min", "fe_spec_min", "fespecmin"];
const SIO2_SPEC_MAX_ALIASES: &[&str] = &["sio2 spec max", "sio2_spec_max", "sio2specmax"];

pub struct LotFieldMapper;

impl FieldMapper for LotFieldMapper {
    fn map_to_lot(&self, row: &RawRecord, row_number: usize) -> ImportResult<Option<Lot>> {
        // Fe 为空或为 0 的行不是批次数据
        let fe = match self.parse_f64(row, FE_ALIASES, "Fe", row_number)? {
            Some(v) if v > 0.0 => v,
            _ => return Ok(None),
        };
        self.check_range("Fe", fe, 0.0, 100.0, row_number)?;

        let sio2 = self.parse_f64(row, SIO2_ALIASES, "SiO2", row_number)?.unwrap_or(0.0);
        let al2o3 = self.parse_f64(row, AL2O3_ALIASES, "Al2O3", row_number)?.unwrap_or(0.0);
        let p = self.parse_f64(row, P_ALIASES, "P", row_number)?.unwrap_or(0.0);
        self.check_range("SiO2", sio2, 0.0, 100.0, row_number)?;
        self.check_range("Al2O3", al2o3, 0.0, 100.0, row_number)?;
        self.check_range("P", p, 0.0, 100.0, row_number)?;

        let tonnage_t = match self.parse_f64(row, TONNAGE_ALIASES, "Tonnage", row_number)? {
            Some(v) if v != 0.0 => v,
            _ => DEFAULT_LOT_TONNAGE_T,
        };
        self.check_range("Tonnage", tonnage_t, f64::MIN_POSITIVE, f64::MAX, row_number)?;

        let lot_id = self
            .get_string(row, LOT_ID_ALIASES)
            .unwrap_or_else(|| format!("Lot_{}", row_number));

        let product_size = self
            .size_column(row)
            .map(ProductSize::detect)
            .unwrap_or_default();

        let spec_override = LotSpecOverride {
            fe_spec_min: self.parse_f64(row, FE_SPEC_MIN_ALIASES, "Fe Spec Min", row_number)?,
            sio2_spec_max: self.parse_f64(row, SIO2_SPEC_MAX_ALIASES, "SiO2 Spec Max", row_number)?,
        };

        // 导入精度: Fe/SiO2 2 位, Al2O3 3 位, P 4 位
        let chemistry = Chemistry::new(
            round_to(fe, 2),
            round_to(sio2, 2),
            round_to(al2o3, 3),
            round_to(p, 4),
        );

        Ok(Some(
            Lot::new(lot_id, tonnage_t, chemistry, product_size).with_spec_override(spec_override),
        ))
    }
}

impl LotFieldMapper {
    /// 提取字符串字段，按别名顺序取第一个非空值
    fn get_string(&self, row: &RawRecord, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            row.get(*alias)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        })
    }

    /// 粒级列: 任一表头含 "size" 或 "product"
    fn size_column<'a>(&self, row: &'a RawRecord) -> Option<&'a str> {
        let mut keys: Vec<&String> = row
            .keys()
            .filter(|k| k.contains("size") || k.contains("product"))
            .collect();
        // HashMap 无序；按列名排序保证多列时结果确定
        keys.sort();
        keys.into_iter()
            .filter_map(|k| row.get(k))
            .map(|v| v.as_str())
            .find(|v| !v.trim().is_empty())
    }

    /// 解析浮点数（允许尾随 %）
    fn parse_f64(
        &self,
        row: &RawRecord,
        aliases: &[&str],
        field: &str,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.get_string(row, aliases) {
            None => Ok(None),
            Some(value) => value
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: field.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }),
        }
    }

    fn check_range(&self, field: &str, value: f64, min: f64, max: f64, row_number: usize) -> ImportResult<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ImportError::ValueRangeError {
                row: row_number,
                field: field.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_map_full_row() {
        let mapper = LotFieldMapper;
        let r = row(&[
            ("lot id", "L-01"),
            ("tonnage", "2500"),
            ("fe%", "63.456"),
            ("sio2%", "4.1"),
            ("al2o3%", "1.23456"),
            ("p%", "0.045678"),
            ("product size", "Fines"),
            ("fe spec min", "60"),
        ]);

        let lot = mapper.map_to_lot(&r, 1).unwrap().unwrap();

        assert_eq!(lot.lot_id, "L-01");
        assert_eq!(lot.tonnage_t, 2500.0);
        assert_eq!(lot.chemistry.fe, 63.46);
        assert_eq!(lot.chemistry.al2o3, 1.235);
        assert_eq!(lot.chemistry.p, 0.0457);
        assert_eq!(lot.product_size, ProductSize::Fines);
        assert_eq!(lot.spec_override.fe_spec_min, Some(60.0));
        assert_eq!(lot.spec_override.sio2_spec_max, None);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let mapper = LotFieldMapper;
        let r = row(&[("fe", "61"), ("sio2", "5")]);

        let lot = mapper.map_to_lot(&r, 7).unwrap().unwrap();

        assert_eq!(lot.lot_id, "Lot_7");
        assert_eq!(lot.tonnage_t, DEFAULT_LOT_TONNAGE_T);
        assert_eq!(lot.product_size, ProductSize::Lump10To40);
        assert_eq!(lot.chemistry.p, 0.0);
    }

    #[test]
    fn test_zero_fe_row_is_skipped() {
        let mapper = LotFieldMapper;
        assert!(mapper.map_to_lot(&row(&[("fe", "0"), ("sio2", "5")]), 1).unwrap().is_none());
        assert!(mapper.map_to_lot(&row(&[("lot", "TOTAL")]), 2).unwrap().is_none());
    }

    #[test]
    fn test_bad_number_is_error() {
        let mapper = LotFieldMapper;
        let result = mapper.map_to_lot(&row(&[("fe", "62"), ("sio2", "abc")]), 3);
        assert!(matches!(
            result,
            Err(ImportError::TypeConversionError { row: 3, .. })
        ));
    }

    #[test]
    fn test_negative_tonnage_is_range_error() {
        let mapper = LotFieldMapper;
        let result = mapper.map_to_lot(&row(&[("fe", "62"), ("tonnage", "-10")]), 4);
        assert!(matches!(result, Err(ImportError::ValueRangeError { .. })));
    }
}
