// Line-oriented assessment form. Every field edit re-runs the classifier.

use amlref_risk::{
    AssessmentInput, ClassificationResult, ResponseMeasurements, RiskClassifier, Wt1Response,
};
use amlref_tables::{default_abnormality, resolve_abnormality, GeneticAbnormality, GENETIC_PROGNOSIS};
use amlref_types::{parse_measurement, TreatmentStage};

use crate::render;

const HELP: &[&str] = &[
    "fields: stage <initial|induction|consolidation1>, gene <label|row|text>,",
    "        wbc <x10^9/L>, cr <yes|no>, mrd <%>, wt1 <Δlog>, prev <%>, curr <%>",
    "        a field name with no value clears it",
    "other:  show, genes, :reset, :help, :quit",
    "note:   wt1 Δlog takes precedence over the prev/curr pair",
];

/// Raw form state. Numeric fields are kept as typed and parsed on evaluation,
/// so unparseable text behaves like an empty field.
#[derive(Debug, Clone)]
pub struct FormSession {
    classifier: RiskClassifier,
    stage: TreatmentStage,
    gene: &'static GeneticAbnormality,
    wbc: String,
    complete_remission: bool,
    mrd: String,
    wt1_log: String,
    wt1_prev: String,
    wt1_curr: String,
}

impl FormSession {
    pub fn new(classifier: RiskClassifier) -> Self {
        Self {
            classifier,
            stage: TreatmentStage::Initial,
            gene: default_abnormality(),
            wbc: String::new(),
            complete_remission: true,
            mrd: String::new(),
            wt1_log: String::new(),
            wt1_prev: String::new(),
            wt1_curr: String::new(),
        }
    }

    pub fn prompt(&self) -> String {
        format!("amlref[{}]> ", self.stage.code())
    }

    pub fn stage(&self) -> TreatmentStage {
        self.stage
    }

    pub fn gene(&self) -> &'static GeneticAbnormality {
        self.gene
    }

    pub fn to_input(&self) -> AssessmentInput {
        let baseline = self.gene.category;
        match self.stage {
            TreatmentStage::Initial => AssessmentInput::initial(baseline, parse_measurement(&self.wbc)),
            TreatmentStage::PostInduction => {
                AssessmentInput::post_induction(baseline, self.complete_remission, self.response())
            }
            TreatmentStage::PostConsolidation1 => {
                AssessmentInput::post_consolidation1(baseline, self.response())
            }
        }
    }

    fn response(&self) -> ResponseMeasurements {
        let wt1 = match parse_measurement(&self.wt1_log) {
            Some(v) => Some(Wt1Response::LogReduction(v)),
            None if !self.wt1_prev.trim().is_empty() || !self.wt1_curr.trim().is_empty() => {
                Some(Wt1Response::Transcripts {
                    previous: parse_measurement(&self.wt1_prev),
                    current: parse_measurement(&self.wt1_curr),
                })
            }
            None => None,
        };
        ResponseMeasurements::new(parse_measurement(&self.mrd), wt1)
    }

    pub fn evaluate(&self) -> ClassificationResult {
        self.classifier.classify(&self.to_input())
    }

    /// Handle one input line. Returns output lines and whether to exit.
    pub fn handle_line(&mut self, line: &str) -> (Vec<String>, bool) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return (Vec::new(), false);
        }
        if trimmed.starts_with(':') {
            return self.handle_command(trimmed);
        }

        let (key, value) = match trimmed.split_once(char::is_whitespace) {
            Some((k, v)) => (k, v.trim()),
            None => (trimmed, ""),
        };
        match key {
            "show" => (self.report(), false),
            "genes" => (gene_list(), false),
            _ => match self.set_field(key, value) {
                Ok(()) => (self.report(), false),
                Err(e) => (vec![format!("error: {e}")], false),
            },
        }
    }

    fn handle_command(&mut self, cmd: &str) -> (Vec<String>, bool) {
        match cmd {
            ":help" | ":h" => (HELP.iter().map(|l| l.to_string()).collect(), false),
            ":q" | ":quit" | ":exit" => (Vec::new(), true),
            ":reset" => {
                *self = Self::new(self.classifier);
                (self.report(), false)
            }
            other => (vec![format!("error: unknown command '{other}'")], false),
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "stage" => {
                self.stage = if value.is_empty() {
                    TreatmentStage::Initial
                } else {
                    value.parse::<TreatmentStage>().map_err(|e| e.to_string())?
                };
            }
            "gene" => {
                self.gene = if value.is_empty() {
                    default_abnormality()
                } else {
                    resolve_abnormality(value).map_err(|e| e.to_string())?
                };
            }
            "cr" => self.complete_remission = parse_yes_no(value)?,
            "wbc" => self.wbc = value.to_string(),
            "mrd" => self.mrd = value.to_string(),
            "wt1" => self.wt1_log = value.to_string(),
            "prev" => self.wt1_prev = value.to_string(),
            "curr" => self.wt1_curr = value.to_string(),
            other => return Err(format!("unknown field '{other}' (try :help)")),
        }
        log::debug!("form field '{key}' set to '{value}'");
        Ok(())
    }

    /// Current field values followed by the classification.
    pub fn report(&self) -> Vec<String> {
        let mut out = vec![format!(
            "[{}] 基因: {} ({})",
            self.stage, self.gene.gene, self.gene.category
        )];
        if self.stage == TreatmentStage::Initial {
            out.push(format!("  WBC: {}", show_raw(&self.wbc)));
        } else {
            if self.stage == TreatmentStage::PostInduction {
                let cr = if self.complete_remission { "是" } else { "否" };
                out.push(format!("  CR: {cr}"));
            }
            out.push(format!("  MRD: {}", show_raw(&self.mrd)));
            out.push(format!(
                "  WT1 Δlog: {}  (prev {}, curr {})",
                show_raw(&self.wt1_log),
                show_raw(&self.wt1_prev),
                show_raw(&self.wt1_curr)
            ));
        }
        out.extend(render::classification(&self.evaluate()));
        out
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(RiskClassifier::default())
    }
}

fn show_raw(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn gene_list() -> Vec<String> {
    GENETIC_PROGNOSIS
        .iter()
        .enumerate()
        .map(|(i, g)| format!("{:>2}. [{}] {}", i + 1, g.category, g.gene))
        .collect()
}

fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "是" => Ok(true),
        "no" | "n" | "false" | "0" | "否" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amlref_risk::{Measurement, RiskFinding};
    use amlref_types::RiskLevel;
    use pretty_assertions::assert_eq;

    fn feed(s: &mut FormSession, lines: &[&str]) -> Vec<String> {
        let mut last = Vec::new();
        for l in lines {
            let (out, exit) = s.handle_line(l);
            assert!(!exit, "unexpected exit on '{l}'");
            last = out;
        }
        last
    }

    #[test]
    fn starts_at_diagnosis_with_first_gene() {
        let s = FormSession::default();
        assert_eq!(s.stage(), TreatmentStage::Initial);
        assert_eq!(s.gene().gene, GENETIC_PROGNOSIS[0].gene);
        assert_eq!(s.prompt(), "amlref[initial]> ");
    }

    #[test]
    fn help_and_quit() {
        let mut s = FormSession::default();
        let (out, exit) = s.handle_line(":help");
        assert!(!exit);
        assert!(out.iter().any(|l| l.starts_with("fields:")));
        let (_out, exit) = s.handle_line(":quit");
        assert!(exit);
    }

    #[test]
    fn every_edit_reevaluates() {
        let mut s = FormSession::default();
        let out = feed(&mut s, &["wbc 150"]);
        assert!(out.iter().any(|l| l == "风险分层: 中危"));
        let out = feed(&mut s, &["wbc 80"]);
        assert!(out.iter().any(|l| l == "风险分层: 标危"));
    }

    #[test]
    fn unparseable_number_counts_as_missing() {
        let mut s = FormSession::default();
        feed(&mut s, &["wbc abc"]);
        assert_eq!(
            s.evaluate().finding,
            RiskFinding::InsufficientData {
                missing: vec![Measurement::Wbc]
            }
        );
    }

    #[test]
    fn induction_without_cr_is_high() {
        let mut s = FormSession::default();
        feed(&mut s, &["stage induction", "cr no", "mrd 0", "wt1 3"]);
        let r = s.evaluate();
        assert_eq!(r.level, RiskLevel::High);
        assert_eq!(r.finding, RiskFinding::NoCompleteRemission);
    }

    #[test]
    fn transcripts_used_when_no_delta_is_entered() {
        let mut s = FormSession::default();
        feed(&mut s, &["stage consolidation1", "mrd 0", "prev 100", "curr 10"]);
        let r = s.evaluate();
        assert_eq!(r.wt1_log_reduction, Some(1.0));
        assert_eq!(r.level, RiskLevel::High);

        feed(&mut s, &["wt1 2.5"]);
        let r = s.evaluate();
        assert_eq!(r.wt1_log_reduction, Some(2.5));
        assert_eq!(r.finding, RiskFinding::TargetsMet);
    }

    #[test]
    fn gene_accepts_row_numbers_and_reports_misses() {
        let mut s = FormSession::default();
        feed(&mut s, &["gene 7"]);
        assert_eq!(s.gene().category, RiskLevel::High);

        let (out, _) = s.handle_line("gene zzz");
        assert!(out[0].starts_with("error:"));
        assert_eq!(s.gene().category, RiskLevel::High);
    }

    #[test]
    fn bad_field_and_command_are_reported() {
        let mut s = FormSession::default();
        let (out, exit) = s.handle_line("age 3");
        assert!(!exit);
        assert!(out[0].contains("unknown field 'age'"));
        let (out, _) = s.handle_line(":nope");
        assert!(out[0].contains("unknown command"));
        let (out, _) = s.handle_line("cr maybe");
        assert!(out[0].contains("expected yes or no"));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = FormSession::default();
        feed(&mut s, &["stage induction", "gene 9", "mrd 1"]);
        feed(&mut s, &[":reset"]);
        assert_eq!(s.stage(), TreatmentStage::Initial);
        assert_eq!(s.to_input(), AssessmentInput::initial(RiskLevel::Low, None));
    }
}
