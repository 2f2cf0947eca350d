// Genetic prognosis tables (protocol tables 2 and 3)

use amlref_types::{PrognosisType, RiskLevel};
use serde::Serialize;
use thiserror::Error;

/// One row of the stratification basis table (table 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneticAbnormality {
    pub gene: &'static str,
    pub category: RiskLevel,
    pub notes: &'static str,
}

/// A co-occurring finding that changes the meaning of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerModifier {
    pub condition: &'static str,
    pub impact: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrognosisMarker {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "no_modifiers")]
    pub modifiers: &'static [MarkerModifier],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<&'static str>,
}

fn no_modifiers(m: &&'static [MarkerModifier]) -> bool {
    m.is_empty()
}

/// A prognosis group of the handbook table (table 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrognosisGroup {
    #[serde(rename = "type")]
    pub prognosis: PrognosisType,
    pub markers: &'static [PrognosisMarker],
}

/// Table 2: prognosis of AML genetic abnormalities, with co-occurring
/// abnormalities and their significance.
pub static TABLE2_GENETIC_PROGNOSIS: &[PrognosisGroup] = &[
    PrognosisGroup {
        prognosis: PrognosisType::Favorable,
        markers: &[
            PrognosisMarker {
                name: "t(8;21)(q22;q22.1)",
                description: "RUNX1-RUNX1T1",
                modifiers: &[
                    MarkerModifier {
                        condition: "伴 KIT 突变 (D816)",
                        impact: "可能抵消预后优势，建议按中危监测",
                    },
                    MarkerModifier {
                        condition: "单纯缺失性染色体",
                        impact: "不影响其优良预后",
                    },
                ],
                significance: Some("核心结合因子(CBF) AML，诱导缓解率高，长期生存率好。"),
            },
            PrognosisMarker {
                name: "inv(16)(p13.1q22) / t(16;16)",
                description: "CBFB-MYH11",
                modifiers: &[MarkerModifier {
                    condition: "伴 KIT 突变",
                    impact: "预后意义同 t(8;21)，需关注复发风险",
                }],
                significance: Some("CBF-AML，对中大剂量 Ara-C 反应极佳。"),
            },
            PrognosisMarker {
                name: "NPM1 突变",
                description: "核磷蛋白突变",
                modifiers: &[
                    MarkerModifier {
                        condition: "不伴 FLT3-ITD",
                        impact: "独立预后良好因子",
                    },
                    MarkerModifier {
                        condition: "伴 FLT3-ITD (AR < 0.5)",
                        impact: "仍维持预后好分类",
                    },
                ],
                significance: Some("正常核型 AML 中最重要的良好预后标记。"),
            },
            PrognosisMarker {
                name: "CEBPA bZip 突变",
                description: "bZip 结构域突变",
                modifiers: &[],
                significance: Some("无论是单突变或双突变，只要涉及 bZip 结构域，预后通常较好。"),
            },
        ],
    },
    PrognosisGroup {
        prognosis: PrognosisType::Intermediate,
        markers: &[
            PrognosisMarker {
                name: "t(9;11)(p21.3;q23.3)",
                description: "MLLT3-KMT2A",
                modifiers: &[],
                significance: Some("KMT2A 重排中预后相对较好的一种。"),
            },
            PrognosisMarker {
                name: "FLT3-ITD (AR < 0.5)",
                description: "低比例突变",
                modifiers: &[
                    MarkerModifier {
                        condition: "伴 NPM1 突变",
                        impact: "分类为预后好",
                    },
                    MarkerModifier {
                        condition: "野生型 NPM1",
                        impact: "维持预后中等",
                    },
                ],
                significance: Some("FLT3 突变负荷（等位基因比例）是决定预后的关键。"),
            },
            PrognosisMarker {
                name: "其他非特定核型",
                description: "如正常核型 (CN-AML)",
                modifiers: &[],
                significance: Some("需结合其他分子学标记如 WT1、ASXL1 等进一步细分。"),
            },
        ],
    },
    PrognosisGroup {
        prognosis: PrognosisType::Adverse,
        markers: &[
            PrognosisMarker {
                name: "t(6;9)(p23;q34.1)",
                description: "DEK-NUP214",
                modifiers: &[],
                significance: Some("常伴 FLT3-ITD，化疗反应差，建议早期移植。"),
            },
            PrognosisMarker {
                name: "t(v;11q23.3)",
                description: "KMT2A 重排 (除外 9;11)",
                modifiers: &[MarkerModifier {
                    condition: "t(4;11) 或 t(10;11)",
                    impact: "预后极差，复发率极高",
                }],
                significance: Some("具有高度侵袭性。"),
            },
            PrognosisMarker {
                name: "复杂核型 (≥3 种)",
                description: "Complex Karyotype",
                modifiers: &[],
                significance: Some("对标准强烈化疗反应差，缓解期短。"),
            },
            PrognosisMarker {
                name: "TP53 突变",
                description: "抑癌基因失活",
                modifiers: &[],
                significance: Some("AML 中最差的分子学标记，对常规化疗耐药。"),
            },
            PrognosisMarker {
                name: "髓系异常相关突变",
                description: "ASXL1, RUNX1, STAG2 等",
                modifiers: &[],
                significance: Some("提示继发性 AML 或具有类 MDS 生物学特征。"),
            },
        ],
    },
];

/// Table 3: basis for risk stratification. The first row is the default
/// selection of the assessment form.
pub static GENETIC_PROGNOSIS: &[GeneticAbnormality] = &[
    GeneticAbnormality {
        gene: "t(8;21) / RUNX1-RUNX1T1",
        category: RiskLevel::Low,
        notes: "KIT D816V转为中危",
    },
    GeneticAbnormality {
        gene: "inv(16) / CBFB-MYH11",
        category: RiskLevel::Low,
        notes: "核心结合因子AML",
    },
    GeneticAbnormality {
        gene: "NPM1 突变",
        category: RiskLevel::Low,
        notes: "伴FLT3-ITD(AR≥0.5)转为中危",
    },
    GeneticAbnormality {
        gene: "CEBPA-bZip 突变",
        category: RiskLevel::Low,
        notes: "预后好",
    },
    GeneticAbnormality {
        gene: "t(9;11) / MLLT3-KMT2A",
        category: RiskLevel::Medium,
        notes: "中危",
    },
    GeneticAbnormality {
        gene: "FLT3-ITD (AR<0.5)",
        category: RiskLevel::Medium,
        notes: "低比例ITD",
    },
    GeneticAbnormality {
        gene: "t(6;9) / DEK-NUP214",
        category: RiskLevel::High,
        notes: "高危",
    },
    GeneticAbnormality {
        gene: "KMT2A重排 (除外9;11)",
        category: RiskLevel::High,
        notes: "如t(4;11)",
    },
    GeneticAbnormality {
        gene: "复杂核型 / TP53突变",
        category: RiskLevel::High,
        notes: "极高危",
    },
];

/// Characteristic features of a risk tier, shown under the genetic manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskTierSummary {
    pub level: RiskLevel,
    pub title: &'static str,
    pub description: &'static str,
}

pub static RISK_TIER_SUMMARIES: &[RiskTierSummary] = &[
    RiskTierSummary {
        level: RiskLevel::Low,
        title: "标危特征",
        description: "多见于 CBF-AML (t(8;21), inv(16)) 且 MRD 快速阴转者，及 CEBPA 双突变。",
    },
    RiskTierSummary {
        level: RiskLevel::Medium,
        title: "中危特征",
        description: "初诊定中危者，若有效使用靶向药物 (如 Gilteritinib) 可显著改善生存。",
    },
    RiskTierSummary {
        level: RiskLevel::High,
        title: "高危特征",
        description: "包含复杂核型、TP53 突变或诱导治疗 2 周骨髓原始细胞仍 > 5% 者。",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no genetic abnormality matches '{0}'")]
    NotFound(String),
    #[error("row index {index} is out of range (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("'{query}' is ambiguous; candidates: {}", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<&'static str>,
    },
}

/// The default genetic selection.
pub fn default_abnormality() -> &'static GeneticAbnormality {
    &GENETIC_PROGNOSIS[0]
}

/// Baseline risk for an exact gene label, if the label is in table 3.
pub fn baseline_risk(gene: &str) -> Option<RiskLevel> {
    GENETIC_PROGNOSIS
        .iter()
        .find(|g| g.gene == gene)
        .map(|g| g.category)
}

/// Resolve a user-supplied selection against table 3.
///
/// Accepted, in order: the exact label, a 1-based row number, or a
/// case-insensitive substring that matches exactly one row.
pub fn resolve_abnormality(query: &str) -> Result<&'static GeneticAbnormality, LookupError> {
    let q = query.trim();
    if let Some(row) = GENETIC_PROGNOSIS.iter().find(|g| g.gene == q) {
        return Ok(row);
    }

    if let Ok(index) = q.parse::<usize>() {
        return match index.checked_sub(1).and_then(|i| GENETIC_PROGNOSIS.get(i)) {
            Some(row) => Ok(row),
            None => Err(LookupError::IndexOutOfRange {
                index,
                len: GENETIC_PROGNOSIS.len(),
            }),
        };
    }

    let needle = q.to_lowercase();
    let hits: Vec<&'static GeneticAbnormality> = GENETIC_PROGNOSIS
        .iter()
        .filter(|g| !needle.is_empty() && g.gene.to_lowercase().contains(&needle))
        .collect();
    match hits.as_slice() {
        [one] => {
            log::debug!("resolved '{q}' to '{}'", one.gene);
            Ok(one)
        }
        [] => Err(LookupError::NotFound(q.to_string())),
        many => Err(LookupError::Ambiguous {
            query: q.to_string(),
            candidates: many.iter().map(|g| g.gene).collect(),
        }),
    }
}

/// Summary paragraph for a risk tier.
pub fn tier_summary(level: RiskLevel) -> &'static RiskTierSummary {
    // RISK_TIER_SUMMARIES is indexed in RiskLevel order
    &RISK_TIER_SUMMARIES[level as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table3_has_nine_rows_grouped_by_tier() {
        assert_eq!(GENETIC_PROGNOSIS.len(), 9);
        let lows = GENETIC_PROGNOSIS
            .iter()
            .filter(|g| g.category == RiskLevel::Low)
            .count();
        let highs = GENETIC_PROGNOSIS
            .iter()
            .filter(|g| g.category == RiskLevel::High)
            .count();
        assert_eq!((lows, highs), (4, 3));
        assert_eq!(default_abnormality().gene, "t(8;21) / RUNX1-RUNX1T1");
    }

    #[test]
    fn table2_groups_follow_prognosis_order() {
        let order: Vec<PrognosisType> = TABLE2_GENETIC_PROGNOSIS
            .iter()
            .map(|g| g.prognosis)
            .collect();
        assert_eq!(
            order,
            vec![
                PrognosisType::Favorable,
                PrognosisType::Intermediate,
                PrognosisType::Adverse
            ]
        );
        let marker_counts: Vec<usize> = TABLE2_GENETIC_PROGNOSIS
            .iter()
            .map(|g| g.markers.len())
            .collect();
        assert_eq!(marker_counts, vec![4, 3, 5]);
    }

    #[test]
    fn baseline_lookup_by_exact_label() {
        assert_eq!(baseline_risk("t(6;9) / DEK-NUP214"), Some(RiskLevel::High));
        assert_eq!(baseline_risk("t(6;9)"), None);
    }

    #[test]
    fn resolves_by_label_index_and_unique_substring() {
        assert_eq!(
            resolve_abnormality("NPM1 突变").unwrap().category,
            RiskLevel::Low
        );
        assert_eq!(
            resolve_abnormality("5").unwrap().gene,
            "t(9;11) / MLLT3-KMT2A"
        );
        assert_eq!(
            resolve_abnormality("dek-nup").unwrap().gene,
            "t(6;9) / DEK-NUP214"
        );
    }

    #[test]
    fn reports_misses_and_ambiguity() {
        assert_eq!(
            resolve_abnormality("0"),
            Err(LookupError::IndexOutOfRange { index: 0, len: 9 })
        );
        assert_eq!(
            resolve_abnormality("BCR-ABL"),
            Err(LookupError::NotFound("BCR-ABL".to_string()))
        );
        match resolve_abnormality("kmt2a") {
            Err(LookupError::Ambiguous { candidates, .. }) => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn tier_summaries_line_up_with_levels() {
        for level in RiskLevel::ALL {
            assert_eq!(tier_summary(level).level, level);
        }
    }

    #[test]
    fn markers_without_modifiers_omit_the_field_in_json() {
        let v = serde_json::to_value(TABLE2_GENETIC_PROGNOSIS[2].markers[0]).unwrap();
        assert!(v.get("modifiers").is_none());
        assert_eq!(v["name"], "t(6;9)(p23;q34.1)");
    }
}
