use handlebars::Handlebars;
use serde::Serialize;

use crate::assets::{BACKGROUND, HIGH_RISK, LOGO, LOW_RISK};
use crate::error::Result;
use crate::records::{FieldKind, FieldSpec, PatientRecord, RiskLabel, FIELD_SPECS};

pub const HIGH_RISK_MESSAGE: &str = "High Risk: Heart disease is likely.";
pub const LOW_RISK_MESSAGE: &str = "Low Risk: Heart disease is unlikely.";

const HEALTH_TIPS: [&str; 5] = [
    "Consult a cardiologist immediately",
    "Eat a heart-friendly diet",
    "Include physical activity",
    "Avoid tobacco, alcohol",
    "Monitor BP & cholesterol",
];

const PAGE: &str = "page";
const HIGH_RISK_TEMPLATE: &str = "high_risk";
const LOW_RISK_TEMPLATE: &str = "low_risk";

/// What follows the form on the page.
pub enum Outcome<'a> {
    Awaiting,
    Result(RiskLabel),
    Invalid(&'a str),
}

/// The form page and the two result templates, parsed once at startup.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(PAGE, include_str!("../templates/page.hbs"))?;
        registry.register_partial(HIGH_RISK_TEMPLATE, include_str!("../templates/high_risk.hbs"))?;
        registry.register_partial(LOW_RISK_TEMPLATE, include_str!("../templates/low_risk.hbs"))?;
        Ok(Pages { registry })
    }

    pub fn render(&self, record: &PatientRecord, outcome: Outcome<'_>) -> Result<String> {
        let mut view = PageView {
            logo: LOGO,
            background: BACKGROUND,
            fields: FIELD_SPECS
                .iter()
                .zip(record.features())
                .map(|(spec, value)| FieldView::new(spec, value))
                .collect(),
            error: None,
            high_risk: None,
            low_risk: None,
        };
        match outcome {
            Outcome::Awaiting => {}
            Outcome::Invalid(message) => view.error = Some(message),
            Outcome::Result(RiskLabel::High) => {
                view.high_risk = Some(ResultView {
                    message: HIGH_RISK_MESSAGE,
                    image: HIGH_RISK,
                    tips: &HEALTH_TIPS,
                })
            }
            Outcome::Result(RiskLabel::Low) => {
                view.low_risk = Some(ResultView {
                    message: LOW_RISK_MESSAGE,
                    image: LOW_RISK,
                    tips: &[],
                })
            }
        }
        Ok(self.registry.render(PAGE, &view)?)
    }
}

#[derive(Serialize)]
struct PageView<'a> {
    logo: &'static str,
    background: &'static str,
    fields: Vec<FieldView>,
    error: Option<&'a str>,
    high_risk: Option<ResultView>,
    low_risk: Option<ResultView>,
}

#[derive(Serialize)]
struct ResultView {
    message: &'static str,
    image: &'static str,
    tips: &'static [&'static str],
}

/// One form control. Exactly one of `number`, `radio` or `select` is set.
#[derive(Serialize)]
struct FieldView {
    id: String,
    name: &'static str,
    label: &'static str,
    number: Option<NumberView>,
    radio: Option<Vec<OptionView>>,
    select: Option<Vec<OptionView>>,
}

#[derive(Serialize)]
struct NumberView {
    min: String,
    max: String,
    step: String,
    value: String,
}

#[derive(Serialize)]
struct OptionView {
    id: String,
    name: &'static str,
    value: u8,
    label: String,
    selected: bool,
}

/// Column names contain spaces, which are not allowed in an element id.
fn element_id(column: &str) -> String {
    format!("field-{}", column.replace(' ', "-"))
}

impl FieldView {
    fn new(spec: &FieldSpec, value: f64) -> Self {
        let id = element_id(spec.column);
        let mut view = FieldView {
            id: id.clone(),
            name: spec.column,
            label: spec.label,
            number: None,
            radio: None,
            select: None,
        };
        match &spec.kind {
            FieldKind::Integer { min, max } => {
                view.number = Some(NumberView {
                    min: min.to_string(),
                    max: max.to_string(),
                    step: "1".to_string(),
                    value: format!("{:.0}", value),
                })
            }
            FieldKind::Decimal { min, max, step } => {
                view.number = Some(NumberView {
                    min: format!("{:.1}", min),
                    max: format!("{:.1}", max),
                    step: step.to_string(),
                    value: format!("{:.1}", value),
                })
            }
            FieldKind::Radio(options) => {
                view.radio = Some(
                    options
                        .iter()
                        .map(|(option, label)| OptionView {
                            id: format!("{}-{}", id, option),
                            name: spec.column,
                            value: *option,
                            label: label.to_string(),
                            selected: f64::from(*option) == value,
                        })
                        .collect(),
                )
            }
            FieldKind::Select(options) => {
                view.select = Some(
                    options
                        .iter()
                        .map(|option| OptionView {
                            id: format!("{}-{}", id, option),
                            name: spec.column,
                            value: *option,
                            label: option.to_string(),
                            selected: f64::from(*option) == value,
                        })
                        .collect(),
                )
            }
        }
        view
    }
}
