//! Text and JSON views of classification results and the reference tables.
//!
//! Text renderers return one `String` per output line; the caller decides
//! where the lines go (stdout for the CLI, the session buffer for the form).

use amlref_kinetics::{wt1_target_log, KineticsVerdict, Wt1Calculator, ZeroReadingPolicy};
use amlref_risk::ClassificationResult;
use amlref_tables::{
    GeneticAbnormality, ItDosage, PrognosisGroup, RiskTierSummary, TargetedDrug, CNS2_CRITERIA,
    CNS_FOLLOW_UP_NOTE, GENETIC_PROGNOSIS, IT_DOSAGES, RISK_TIER_SUMMARIES,
    TABLE2_GENETIC_PROGNOSIS, TARGETED_THERAPY_NOTES,
};
use amlref_types::TreatmentStage;
use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn fmt_log(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2} log"),
        None => "未确定".to_string(),
    }
}

pub fn classification(r: &ClassificationResult) -> Vec<String> {
    let mut out = vec![
        format!("评估阶段: {}", r.stage),
        format!("遗传学基线: {}", r.baseline),
        format!("风险分层: {}", r.level),
        format!("判定依据: {}", r.reason),
    ];
    if r.stage.is_response_stage() {
        out.push(format!("WT1 Δlog: {}", fmt_log(r.wt1_log_reduction)));
    }
    out
}

/// Verdict of one reduction against one stage target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageTarget {
    pub stage: TreatmentStage,
    pub target_log: f64,
    pub verdict: KineticsVerdict,
}

/// Result of the standalone WT1 calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wt1Report {
    pub previous_percent: Option<f64>,
    pub current_percent: Option<f64>,
    pub log_reduction: Option<f64>,
    pub zero_policy: ZeroReadingPolicy,
    pub targets: Vec<StageTarget>,
}

impl Wt1Report {
    /// Compute the reduction and judge it against `stage`'s target, or
    /// against every stage that has one when no stage is given.
    pub fn compute(
        calc: &Wt1Calculator,
        previous: Option<f64>,
        current: Option<f64>,
        stage: Option<TreatmentStage>,
    ) -> Self {
        let log_reduction = calc.log_reduction(previous, current);
        let stages: Vec<TreatmentStage> = match stage {
            Some(s) => vec![s],
            None => TreatmentStage::ALL.to_vec(),
        };
        let targets = stages
            .into_iter()
            .filter_map(|s| {
                wt1_target_log(s).map(|target_log| StageTarget {
                    stage: s,
                    target_log,
                    verdict: KineticsVerdict::assess(log_reduction, target_log),
                })
            })
            .collect();
        Self {
            previous_percent: previous,
            current_percent: current,
            log_reduction,
            zero_policy: calc.policy(),
            targets,
        }
    }
}

pub fn wt1_report(r: &Wt1Report) -> Vec<String> {
    let pct = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v}%"));
    let mut out = vec![
        format!("上一次 WT1: {}", pct(r.previous_percent)),
        format!("本次 WT1: {}", pct(r.current_percent)),
        format!("Δlog = log10(上一次 ÷ 本次): {}", fmt_log(r.log_reduction)),
    ];
    if r.log_reduction.is_none() {
        out.push(KineticsVerdict::Pending.label().to_string());
        return out;
    }
    for t in &r.targets {
        out.push(format!(
            "{}标危 (≥ {:.1}): {}",
            t.stage,
            t.target_log,
            t.verdict.label()
        ));
    }
    out
}

/// Which part of the genetics reference to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneticsSection {
    #[default]
    All,
    Table2,
    Manual,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneticsReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table2: Option<&'static [PrognosisGroup]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<&'static [GeneticAbnormality]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiers: Option<&'static [RiskTierSummary]>,
}

impl GeneticsReference {
    pub fn new(section: GeneticsSection) -> Self {
        let table2 = matches!(section, GeneticsSection::All | GeneticsSection::Table2);
        let manual = matches!(section, GeneticsSection::All | GeneticsSection::Manual);
        Self {
            table2: table2.then_some(TABLE2_GENETIC_PROGNOSIS),
            manual: manual.then_some(GENETIC_PROGNOSIS),
            tiers: manual.then_some(RISK_TIER_SUMMARIES),
        }
    }
}

pub fn genetics(r: &GeneticsReference) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(groups) = r.table2 {
        out.push("表2 AML 遗传学异常的预后意义".to_string());
        for g in groups {
            out.push(format!("【{}】", g.prognosis));
            for m in g.markers {
                out.push(format!("  {}  {}", m.name, m.description));
                for md in m.modifiers {
                    out.push(format!("    · {}: {}", md.condition, md.impact));
                }
                if let Some(sig) = m.significance {
                    out.push(format!("    意义: {sig}"));
                }
            }
        }
    }
    if let Some(rows) = r.manual {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.push("遗传学分层依据".to_string());
        for (i, g) in rows.iter().enumerate() {
            out.push(format!("  {:>2}. [{}] {}  {}", i + 1, g.category, g.gene, g.notes));
        }
    }
    if let Some(tiers) = r.tiers {
        out.push(String::new());
        for t in tiers {
            out.push(format!("{} ({}): {}", t.title, t.level, t.description));
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct DrugsReference {
    pub drugs: Vec<&'static TargetedDrug>,
    pub notes: &'static [&'static str],
}

impl DrugsReference {
    pub fn new(drugs: Vec<&'static TargetedDrug>) -> Self {
        Self {
            drugs,
            notes: TARGETED_THERAPY_NOTES,
        }
    }
}

pub fn drugs(r: &DrugsReference) -> Vec<String> {
    let mut out = vec!["表6 靶向药物".to_string()];
    if r.drugs.is_empty() {
        out.push("  (无匹配药物)".to_string());
    }
    for d in &r.drugs {
        let name = match d.brand_name {
            Some(brand) => format!("{} ({brand})", d.name),
            None => d.name.to_string(),
        };
        out.push(format!("  [{}] {name}", d.target));
        out.push(format!("      剂量: {}", d.dosage));
        out.push(format!("      注意: {}", d.precautions));
    }
    out.push(String::new());
    out.push("临床决策要点".to_string());
    for (i, note) in r.notes.iter().enumerate() {
        out.push(format!("  {}. {note}", i + 1));
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct IntrathecalReference {
    pub dosages: &'static [ItDosage],
    pub cns2_criteria: &'static [&'static str],
    pub follow_up_note: &'static str,
}

impl Default for IntrathecalReference {
    fn default() -> Self {
        Self {
            dosages: IT_DOSAGES,
            cns2_criteria: CNS2_CRITERIA,
            follow_up_note: CNS_FOLLOW_UP_NOTE,
        }
    }
}

pub fn intrathecal(r: &IntrathecalReference) -> Vec<String> {
    let mut out = vec![
        "表7A 三联鞘注剂量 (按年龄)".to_string(),
        format!("  {:<6} {:<8} {:<8} {:<6} {}", "年龄", "MTX", "Ara-C", "DXM", "终体积"),
    ];
    for d in r.dosages {
        out.push(format!(
            "  {:<6} {:<8} {:<8} {:<6} {}",
            d.age_label, d.mtx, d.ara_c, d.dxm, d.final_volume
        ));
    }
    out.push(String::new());
    out.push("CNS 2 判定标准 (满足任一项)".to_string());
    for c in r.cns2_criteria {
        out.push(format!("  - {c}"));
    }
    out.push(r.follow_up_note.to_string());
    out
}
