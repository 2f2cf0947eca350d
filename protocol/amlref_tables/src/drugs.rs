// Targeted therapy reference (protocol table 6)

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetedDrug {
    /// Molecular target, e.g. `FLT3`.
    pub target: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<&'static str>,
    pub dosage: &'static str,
    pub precautions: &'static str,
}

impl TargetedDrug {
    /// Case-insensitive match on name, brand name, or target.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        hit(self.name) || hit(self.target) || self.brand_name.is_some_and(hit)
    }
}

pub static TARGETED_DRUGS: &[TargetedDrug] = &[
    TargetedDrug {
        target: "BCL2",
        name: "维奈克拉",
        brand_name: Some("Venetoclax"),
        dosage: "200-250mg/m².d qd",
        precautions: "禁用于TP53突变；CYP3A抑制剂减量1/3",
    },
    TargetedDrug {
        target: "FLT3",
        name: "米哚妥林",
        brand_name: Some("Midostaurin"),
        dosage: "20-30mg/m².次 q12h",
        precautions: "CYP3A抑制剂需减量",
    },
    TargetedDrug {
        target: "FLT3",
        name: "吉瑞替尼",
        brand_name: Some("Gilteritinib"),
        dosage: "60-70mg/m².d qd",
        precautions: "用于复发或难治性FLT3+",
    },
    TargetedDrug {
        target: "IDH1",
        name: "艾伏尼布",
        brand_name: Some("Ivosidenib"),
        dosage: "200-300mg/m².d qd",
        precautions: "CYP3A抑制剂需减量",
    },
];

/// Key points printed alongside the targeted drug table.
pub static TARGETED_THERAPY_NOTES: &[&str] = &[
    "维奈克拉 (VEN) 与强效 CYP3A 抑制剂 (如泊沙康唑) 联用时需减量 1/3。",
    "吉瑞替尼仅推荐用于 FLT3-ITD 比率 ≥ 0.5 的初治或复发难治患者。",
    "如有条件，建议尽早 (诱导期) 加入靶向治疗以提高 MRD 阴转率。",
];

/// Filter the drug table. An empty term returns every row, in table order.
pub fn search_drugs(term: &str) -> Vec<&'static TargetedDrug> {
    let out: Vec<&'static TargetedDrug> =
        TARGETED_DRUGS.iter().filter(|d| d.matches(term)).collect();
    log::debug!("drug search '{term}' matched {} row(s)", out.len());
    out
}
