// Triple intrathecal dosing by age (protocol table 7A) and CNS status criteria

use serde::Serialize;

/// Doses for one age bracket. Intrathecal therapy is dosed by age, not weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItDosage {
    pub age_label: &'static str,
    /// Methotrexate
    pub mtx: &'static str,
    /// Cytarabine
    pub ara_c: &'static str,
    /// Dexamethasone
    pub dxm: &'static str,
    pub final_volume: &'static str,
}

pub static IT_DOSAGES: &[ItDosage] = &[
    ItDosage {
        age_label: "～1岁",
        mtx: "5mg",
        ara_c: "10mg",
        dxm: "2mg",
        final_volume: "4ml",
    },
    ItDosage {
        age_label: "～2岁",
        mtx: "7.5mg",
        ara_c: "15mg",
        dxm: "2mg",
        final_volume: "5ml",
    },
    ItDosage {
        age_label: "～3岁",
        mtx: "10mg",
        ara_c: "25mg",
        dxm: "5mg",
        final_volume: "6ml",
    },
    ItDosage {
        age_label: "＞3岁",
        mtx: "12.5mg",
        ara_c: "35mg",
        dxm: "5mg",
        final_volume: "6ml",
    },
];

/// Any one of these findings places a patient at CNS 2.
pub static CNS2_CRITERIA: &[&str] = &[
    "CSF WBC ≤ 5/ul, 但离心涂片或流式细胞术发现 AML 细胞。",
    "腰穿损伤但无 AML 细胞，且外周血 WBC > 50×10⁹/L。",
    "CSF 正常但影像学 (MRI) 发现明确的软脑膜或脑实质浸润。",
];

pub const CNS_FOLLOW_UP_NOTE: &str =
    "* 注：凡初诊判定为 CNS 2/3 的患者，需增加 IT 频次 (QOD 直至 CSF 阴性，后继续 IT qw × 3)。";
