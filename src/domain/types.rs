// ==========================================
// 矿石配矿系统 - 领域类型定义
// ==========================================
// 职责: 粒级、化学指标、分配状态等枚举类型
// 序列化格式: 与展示层约定的字面标签一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 产品粒级 (Product Size)
// ==========================================
// 固定集合; 声明顺序即结果映射的输出顺序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductSize {
    #[default]
    #[serde(rename = "10-40mm")]
    Lump10To40, // 块矿 10-40mm（缺省粒级）
    #[serde(rename = "Fines")]
    Fines, // 粉矿
}

impl ProductSize {
    /// 全部粒级（按处理顺序）
    pub const ALL: [ProductSize; 2] = [ProductSize::Lump10To40, ProductSize::Fines];

    /// 展示层使用的字面标签
    pub fn label(&self) -> &'static str {
        match self {
            ProductSize::Lump10To40 => "10-40mm",
            ProductSize::Fines => "Fines",
        }
    }

    /// 从自由文本识别粒级
    ///
    /// 规则:
    /// - 含 "fine" → Fines
    /// - 含 "10-40" 或 "coarse" → 10-40mm
    /// - 其他（含空值）→ 缺省 10-40mm
    pub fn detect(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("fine") {
            ProductSize::Fines
        } else {
            ProductSize::Lump10To40
        }
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProductSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "10-40mm" => Ok(ProductSize::Lump10To40),
            "Fines" => Ok(ProductSize::Fines),
            other => Err(format!("未知粒级: {}", other)),
        }
    }
}

// ==========================================
// 化学指标 (Chemistry Parameter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChemParam {
    Fe,
    SiO2,
    Al2O3,
    P,
}

impl ChemParam {
    pub const ALL: [ChemParam; 4] = [ChemParam::Fe, ChemParam::SiO2, ChemParam::Al2O3, ChemParam::P];

    /// 声明的小数精度: Fe/SiO2 为 3 位, Al2O3/P 为 4 位
    pub fn precision(&self) -> usize {
        match self {
            ChemParam::Fe | ChemParam::SiO2 => 3,
            ChemParam::Al2O3 | ChemParam::P => 4,
        }
    }

    /// Fe 为下限指标，其余杂质为上限指标
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, ChemParam::Fe)
    }

    /// i18n 键名片段
    pub fn key(&self) -> &'static str {
        match self {
            ChemParam::Fe => "fe",
            ChemParam::SiO2 => "sio2",
            ChemParam::Al2O3 => "al2o3",
            ChemParam::P => "p",
        }
    }
}

impl fmt::Display for ChemParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChemParam::Fe => write!(f, "Fe"),
            ChemParam::SiO2 => write!(f, "SiO2"),
            ChemParam::Al2O3 => write!(f, "Al2O3"),
            ChemParam::P => write!(f, "P"),
        }
    }
}

/// 按声明精度四舍五入
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ==========================================
// 分配状态 (Allocation Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    Accepted,  // 贪心轮直接接受
    Recovered, // 加权平均补偿回收
    Forced,    // 强制分配（指标超限）
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStatus::Accepted => write!(f, "ACCEPTED"),
            AllocationStatus::Recovered => write!(f, "RECOVERED"),
            AllocationStatus::Forced => write!(f, "FORCED"),
        }
    }
}

// ==========================================
// 规格来源 (Spec Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecSource {
    Global,       // 全局缺省
    SizeOverride, // 粒级覆写
    LotEmbedded,  // 批次内嵌规格
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::Global => write!(f, "GLOBAL"),
            SpecSource::SizeOverride => write!(f, "SIZE_OVERRIDE"),
            SpecSource::LotEmbedded => write!(f, "LOT_EMBEDDED"),
        }
    }
}

// ==========================================
// 化学成分计算基准
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChemistryBasis {
    Allocated,  // 按已分配吨位加权
    FullLotSet, // 无任何分配时，按全部批次加权（兜底）
}

// ==========================================
// 调整状态 / 告警等级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentStatus {
    Met,         // 已满足
    Required,    // 需补充参考品位物料
    Unreachable, // 参考品位无法弥补缺口
}

impl fmt::Display for AdjustmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentStatus::Met => write!(f, "MET"),
            AdjustmentStatus::Required => write!(f, "REQUIRED"),
            AdjustmentStatus::Unreachable => write!(f, "UNREACHABLE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmType {
    SidecastRequired, // 存在强制分配，需人工处置
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_size_detect() {
        assert_eq!(ProductSize::detect("Fines"), ProductSize::Fines);
        assert_eq!(ProductSize::detect("  iron ore FINES "), ProductSize::Fines);
        assert_eq!(ProductSize::detect("10-40"), ProductSize::Lump10To40);
        assert_eq!(ProductSize::detect("Coarse lump"), ProductSize::Lump10To40);
        assert_eq!(ProductSize::detect(""), ProductSize::Lump10To40);
        assert_eq!(ProductSize::detect("6-30mm"), ProductSize::Lump10To40);
    }

    #[test]
    fn test_product_size_label_round_trip() {
        for size in ProductSize::ALL {
            assert_eq!(size.label().parse::<ProductSize>().unwrap(), size);
        }
        assert!("5-10mm".parse::<ProductSize>().is_err());
    }

    #[test]
    fn test_product_size_serde_label() {
        let json = serde_json::to_string(&ProductSize::Lump10To40).unwrap();
        assert_eq!(json, "\"10-40mm\"");
        let parsed: ProductSize = serde_json::from_str("\"Fines\"").unwrap();
        assert_eq!(parsed, ProductSize::Fines);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&AllocationStatus::Recovered).unwrap();
        assert_eq!(json, "\"RECOVERED\"");
        assert_eq!(AllocationStatus::Forced.to_string(), "FORCED");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(62.23456, 3), 62.235);
        assert_eq!(round_to(0.123449, 4), 0.1234);
    }
}
