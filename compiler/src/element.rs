//! Per-element flag rules: what each flag means, and how an element's flags
//! resolve into one set of facts.
//!
//! Resolution is a pure function of the element and its position. It never
//! touches the graph; the builder consumes the returned facts.

use crate::candidate::{resolve_candidates, Candidate};
use crate::flags::{tokenize_flags, Flag};
use crate::CompileError;
use aggraph_model::{EnumPresentation, ModelKind, TextWidth};
use aggraph_parser::Element;
use aggraph_registry::builtin;
use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Attribute holding the flag string.
pub const FLAGS_ATTRIBUTE: &str = "is";
/// Aggregate name when it differs from the element name.
pub const AGGREGATE_ATTRIBUTE: &str = "aggregate";
pub const DISPLAY_NAME_ATTRIBUTE: &str = "DisplayName";
pub const DB_NAME_ATTRIBUTE: &str = "DbName";
/// Integer value of an enum item.
pub const KEY_ATTRIBUTE: &str = "key";

pub const KNOWN_ATTRIBUTES: [&str; 5] = [
    FLAGS_ATTRIBUTE,
    AGGREGATE_ATTRIBUTE,
    DISPLAY_NAME_ATTRIBUTE,
    DB_NAME_ATTRIBUTE,
    KEY_ATTRIBUTE,
];

const WIDTH_PATTERN: &str = r"^([zh])([0-9]+)$";

/// What an element declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    RootAggregate,
    ChildAggregate,
    /// Groups variation items; produces no node of its own.
    VariationContainer,
    VariationItem,
    Scalar,
    Ref,
    Enum,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::RootAggregate => "root aggregate",
            ElementKind::ChildAggregate => "child aggregate",
            ElementKind::VariationContainer => "variation group",
            ElementKind::VariationItem => "variation item",
            ElementKind::Scalar => "scalar member",
            ElementKind::Ref => "reference",
            ElementKind::Enum => "enum",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ElementKind::RootAggregate | ElementKind::ChildAggregate | ElementKind::VariationItem
        )
    }
}

/// A property flags can propose a value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Kind,
    Model,
    IsArray,
    VariationKey,
    RefTarget,
    DependsOn,
    IsKey,
    IsDisplayName,
    IsNameLike,
    IsRequired,
    Invisible,
    ReadOnly,
    HasLifecycle,
    MemberType,
    Step,
    EnumPresentation,
    Width,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Kind => "element kind",
            Property::Model => "model",
            Property::IsArray => "multiplicity",
            Property::VariationKey => "variation key",
            Property::RefTarget => "reference target",
            Property::DependsOn => "dependency",
            Property::IsKey => "key",
            Property::IsDisplayName => "display name",
            Property::IsNameLike => "name-like",
            Property::IsRequired => "required",
            Property::Invisible => "visibility",
            Property::ReadOnly => "read-only",
            Property::HasLifecycle => "lifecycle",
            Property::MemberType => "member type",
            Property::Step => "step",
            Property::EnumPresentation => "enum presentation",
            Property::Width => "width",
        }
    }
}

/// A proposed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Kind(ElementKind),
    Model(ModelKind),
    Flag(bool),
    Text(String),
    Int(i64),
    Presentation(EnumPresentation),
    Width(TextWidth),
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Kind(kind) => write!(f, "{}", kind.as_str()),
            FactValue::Model(model) => write!(f, "{}", model.as_str()),
            FactValue::Flag(b) => write!(f, "{}", b),
            FactValue::Text(s) => write!(f, "{}", s),
            FactValue::Int(i) => write!(f, "{}", i),
            FactValue::Presentation(EnumPresentation::Combo) => write!(f, "combo"),
            FactValue::Presentation(EnumPresentation::Radio) => write!(f, "radio"),
            FactValue::Width(TextWidth::Zenkaku(n)) => write!(f, "z{}", n),
            FactValue::Width(TextWidth::Hankaku(n)) => write!(f, "h{}", n),
        }
    }
}

type Fact = Candidate<Property, FactValue>;

/// Everything an element's flags resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFacts {
    pub kind: ElementKind,
    pub model: Option<ModelKind>,
    pub is_array: bool,
    pub variation_key: Option<String>,
    pub ref_target: Option<String>,
    pub depends_on: Option<String>,
    pub is_key: bool,
    pub is_display_name: bool,
    pub is_name_like: bool,
    pub is_required: bool,
    pub invisible: bool,
    pub read_only: bool,
    pub has_lifecycle: bool,
    pub member_type: Option<String>,
    pub step: Option<i64>,
    pub enum_presentation: Option<EnumPresentation>,
    pub width: Option<TextWidth>,
    /// Tokens no rule recognized.
    pub unhandled: Vec<String>,
}

impl ElementFacts {
    fn with_kind(kind: ElementKind) -> Self {
        Self {
            kind,
            model: None,
            is_array: false,
            variation_key: None,
            ref_target: None,
            depends_on: None,
            is_key: false,
            is_display_name: false,
            is_name_like: false,
            is_required: false,
            invisible: false,
            read_only: false,
            has_lifecycle: false,
            member_type: None,
            step: None,
            enum_presentation: None,
            width: None,
            unhandled: Vec::new(),
        }
    }
}

/// What one flag contributes.
enum FlagRule {
    Facts(Vec<Fact>),
    /// Recognized, but its value is missing or malformed.
    Invalid,
    Unrecognized,
}

fn model_flag(model: ModelKind) -> FlagRule {
    FlagRule::Facts(vec![
        Candidate::force(Property::Kind, FactValue::Kind(ElementKind::RootAggregate)),
        Candidate::force(Property::Model, FactValue::Model(model)),
    ])
}

fn type_flag(type_name: &str) -> Vec<Fact> {
    vec![
        Candidate::force(Property::Kind, FactValue::Kind(ElementKind::Scalar)),
        Candidate::force(Property::MemberType, FactValue::Text(type_name.to_string())),
    ]
}

fn set(property: Property) -> Fact {
    Candidate::force(property, FactValue::Flag(true))
}

fn parse_width(value: &str) -> Option<TextWidth> {
    static WIDTH: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = WIDTH.get_or_init(|| Regex::new(WIDTH_PATTERN).ok()).as_ref()?;
    let captures = pattern.captures(value)?;
    let count: u32 = captures.get(2)?.as_str().parse().ok()?;
    match captures.get(1)?.as_str() {
        "z" => Some(TextWidth::Zenkaku(count)),
        _ => Some(TextWidth::Hankaku(count)),
    }
}

/// The facts a single flag proposes.
fn flag_rule(flag: &Flag) -> FlagRule {
    use FactValue as V;
    use Property as P;

    let value = flag.value.as_deref();
    match flag.key.as_str() {
        "write-model" => model_flag(ModelKind::WriteModel),
        "read-model" => model_flag(ModelKind::ReadModel),
        "command" => model_flag(ModelKind::Command),
        "value-object" => model_flag(ModelKind::ValueObject),
        "child" | "children" => FlagRule::Facts(vec![
            Candidate::force(P::Kind, V::Kind(ElementKind::ChildAggregate)),
            Candidate::force(P::IsArray, V::Flag(flag.key == "children")),
        ]),
        "variation" => FlagRule::Facts(vec![Candidate::force(
            P::Kind,
            V::Kind(ElementKind::VariationContainer),
        )]),
        "variation-item" | "variation-key" | "section" => match value {
            Some(key) => FlagRule::Facts(vec![
                Candidate::force(P::Kind, V::Kind(ElementKind::VariationItem)),
                Candidate::force(P::VariationKey, V::Text(key.to_string())),
            ]),
            None => FlagRule::Invalid,
        },
        "ref-to" => match value {
            Some(target) => FlagRule::Facts(vec![
                Candidate::force(P::Kind, V::Kind(ElementKind::Ref)),
                Candidate::force(P::RefTarget, V::Text(target.to_string())),
            ]),
            None => FlagRule::Invalid,
        },
        "depends-on" => match value {
            Some(target) => {
                FlagRule::Facts(vec![Candidate::force(P::DependsOn, V::Text(target.to_string()))])
            }
            None => FlagRule::Invalid,
        },
        "key" => FlagRule::Facts(vec![
            Candidate::if_not_specified(P::Kind, V::Kind(ElementKind::Scalar)),
            set(P::IsKey),
            set(P::IsRequired),
        ]),
        "name" => FlagRule::Facts(vec![
            Candidate::if_not_specified(P::Kind, V::Kind(ElementKind::Scalar)),
            set(P::IsDisplayName),
            Candidate::if_not_specified(P::IsNameLike, V::Flag(true)),
            Candidate::if_not_specified(P::MemberType, V::Text(builtin::WORD.to_string())),
        ]),
        "name-like" => FlagRule::Facts(vec![set(P::IsNameLike)]),
        "required" => FlagRule::Facts(vec![set(P::IsRequired)]),
        "hidden" => FlagRule::Facts(vec![set(P::Invisible)]),
        "readonly" => FlagRule::Facts(vec![set(P::ReadOnly)]),
        "has-lifecycle" => FlagRule::Facts(vec![set(P::HasLifecycle)]),
        "uuid" => FlagRule::Facts(vec![
            Candidate::force(P::Kind, V::Kind(ElementKind::Scalar)),
            Candidate::force(P::MemberType, V::Text(builtin::UUID.to_string())),
            Candidate::if_not_specified(P::IsKey, V::Flag(true)),
            Candidate::if_not_specified(P::IsRequired, V::Flag(true)),
            Candidate::if_not_specified(P::Invisible, V::Flag(true)),
        ]),
        "sentence" => {
            let mut facts = type_flag(builtin::SENTENCE);
            facts.push(set(P::IsDisplayName));
            FlagRule::Facts(facts)
        }
        key @ ("word" | "int" | "decimal" | "bool" | "date" | "datetime" | "yearmonth") => {
            FlagRule::Facts(type_flag(key))
        }
        "step" => match value.and_then(|v| v.parse::<i64>().ok()) {
            Some(step) => FlagRule::Facts(vec![Candidate::force(P::Step, V::Int(step))]),
            None => FlagRule::Invalid,
        },
        "combo" => FlagRule::Facts(vec![Candidate::force(
            P::EnumPresentation,
            V::Presentation(EnumPresentation::Combo),
        )]),
        "radio" => FlagRule::Facts(vec![Candidate::force(
            P::EnumPresentation,
            V::Presentation(EnumPresentation::Radio),
        )]),
        "width" => match value.and_then(parse_width) {
            Some(width) => FlagRule::Facts(vec![Candidate::force(P::Width, V::Width(width))]),
            None => FlagRule::Invalid,
        },
        "enum" => FlagRule::Facts(vec![Candidate::force(P::Kind, V::Kind(ElementKind::Enum))]),
        _ => FlagRule::Unrecognized,
    }
}

/// Resolve an element's flag string into facts.
///
/// `top_level` selects the kind used when no flag decides it: top-level
/// elements default to root aggregates, nested ones to scalar members.
/// Problems are returned alongside the facts; the facts are always usable.
pub fn resolve_element(element: &Element, top_level: bool) -> (ElementFacts, Vec<CompileError>) {
    let span = element.span;
    let text = element.attr(FLAGS_ATTRIBUTE).unwrap_or_default();
    let (flags, mut errors) = tokenize_flags(text, &element.name, span);

    let mut candidates = Vec::new();
    let mut unhandled = Vec::new();
    for flag in &flags {
        match flag_rule(flag) {
            FlagRule::Facts(facts) => candidates.extend(facts),
            FlagRule::Invalid => match &flag.value {
                Some(value) => errors.push(CompileError::invalid_flag_value(
                    &element.name,
                    &flag.key,
                    value,
                    span,
                )),
                None => errors.push(CompileError::missing_flag_value(&element.name, &flag.key, span)),
            },
            FlagRule::Unrecognized => unhandled.push(flag.key.clone()),
        }
    }

    let resolved = resolve_candidates(&candidates);
    for conflict in resolved.conflicts() {
        let values = conflict
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(CompileError::conflicting_flags(
            &element.name,
            conflict.property.as_str(),
            values,
            span,
        ));
    }

    let default_kind = if top_level {
        ElementKind::RootAggregate
    } else {
        ElementKind::Scalar
    };
    let mut facts = ElementFacts::with_kind(default_kind);
    for (property, value) in resolved.values() {
        match (property, value) {
            (Property::Kind, FactValue::Kind(kind)) => facts.kind = *kind,
            (Property::Model, FactValue::Model(model)) => facts.model = Some(*model),
            (Property::IsArray, FactValue::Flag(b)) => facts.is_array = *b,
            (Property::VariationKey, FactValue::Text(s)) => facts.variation_key = Some(s.clone()),
            (Property::RefTarget, FactValue::Text(s)) => facts.ref_target = Some(s.clone()),
            (Property::DependsOn, FactValue::Text(s)) => facts.depends_on = Some(s.clone()),
            (Property::IsKey, FactValue::Flag(b)) => facts.is_key = *b,
            (Property::IsDisplayName, FactValue::Flag(b)) => facts.is_display_name = *b,
            (Property::IsNameLike, FactValue::Flag(b)) => facts.is_name_like = *b,
            (Property::IsRequired, FactValue::Flag(b)) => facts.is_required = *b,
            (Property::Invisible, FactValue::Flag(b)) => facts.invisible = *b,
            (Property::ReadOnly, FactValue::Flag(b)) => facts.read_only = *b,
            (Property::HasLifecycle, FactValue::Flag(b)) => facts.has_lifecycle = *b,
            (Property::MemberType, FactValue::Text(s)) => facts.member_type = Some(s.clone()),
            (Property::Step, FactValue::Int(i)) => facts.step = Some(*i),
            (Property::EnumPresentation, FactValue::Presentation(p)) => {
                facts.enum_presentation = Some(*p)
            }
            (Property::Width, FactValue::Width(w)) => facts.width = Some(*w),
            (property, value) => {
                tracing::debug!(property = property.as_str(), %value, "fact ignored");
            }
        }
    }

    // Leftover tokens: one on an untyped scalar names its type.
    match unhandled.as_slice() {
        [] => {}
        [single] if facts.kind == ElementKind::Scalar && facts.member_type.is_none() => {
            facts.member_type = Some(single.clone());
        }
        _ => errors.push(CompileError::unknown_flags(&element.name, &unhandled, span)),
    }

    if facts.kind == ElementKind::Enum {
        for flag in flags.iter().filter(|f| f.key != "enum") {
            errors.push(CompileError::flag_not_applicable(&element.name, &flag.key, span));
        }
    }
    if facts.depends_on.is_some() && facts.kind != ElementKind::RootAggregate {
        errors.push(CompileError::flag_not_applicable(&element.name, "depends-on", span));
        facts.depends_on = None;
    }

    facts.unhandled = unhandled;
    (facts, errors)
}
