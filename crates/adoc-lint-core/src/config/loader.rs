//! DTO → rule model conversion with validation.

use std::collections::BTreeMap;

use crate::model::{
    AdmonitionRules, AudioRules, BlockConstraints, BlockKind, BlockRule, CountRule, DlistRules,
    ExampleRules, ImageRules, ListRules, ListingRules, LiteralRules, MetadataAttributeRule,
    ModelError, NumericRule, Occurrence, ParagraphRules, PassRules, Pattern, QuoteRules,
    RuleModel, RuleModelBuilder, SectionId, SectionRule, SentenceRule, SidebarRules, TableRules,
    TextRule, ValueSet, VideoRules,
};
use crate::types::Severity;

use super::dto::{
    BlockDto, FieldDto, MetadataDto, OccurrenceDto, RulesConfigDto, SectionDto, SettingsDto,
};
use super::Settings;

/// Errors during DTO → model conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "sections[0].title.pattern").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Block kind tag is not one of the known kinds.
    #[error("{context}: unknown block kind `{kind}`")]
    UnknownBlockKind {
        /// Where the error occurred.
        context: String,
        /// The unknown tag.
        kind: String,
    },

    /// A constraint key is not part of the kind's or field's vocabulary.
    #[error("{context}: unknown key `{key}` for {owner}")]
    UnknownField {
        /// Where the error occurred.
        context: String,
        /// The unknown key.
        key: String,
        /// What the key was given to (a block kind or constraint type).
        owner: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warn, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Lower bound exceeds upper bound.
    #[error("{context}: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        /// Where the error occurred.
        context: String,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },

    /// Cross-reference errors from rule model construction.
    #[error("rule validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `RulesConfigDto` to settings and a validated `RuleModel`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RulesConfigDto) -> Result<(RuleModel, Settings), LoadError> {
    let settings = convert_settings(dto.settings)?;
    let mut builder = RuleModel::builder();

    for (i, meta) in dto.metadata.into_iter().enumerate() {
        builder.metadata(convert_metadata(meta, i)?);
    }

    for (i, section) in dto.sections.into_iter().enumerate() {
        convert_section(&mut builder, None, section, &format!("sections[{i}]"))?;
    }

    let model = builder.build().map_err(LoadError::CrossRef)?;
    Ok((model, settings))
}

fn convert_settings(dto: SettingsDto) -> Result<Settings, LoadError> {
    let fail_on = parse_severity(&dto.fail_on, "settings.fail-on")?;
    Ok(Settings {
        context_lines: dto.context_lines,
        fail_on,
        exclude: dto.exclude,
    })
}

fn convert_metadata(dto: MetadataDto, index: usize) -> Result<MetadataAttributeRule, LoadError> {
    let ctx = format!("metadata[{index}]");
    if dto.name.is_empty() {
        return Err(LoadError::Validation {
            context: format!("{ctx}.name"),
            source: ModelError::EmptyName {
                context: "metadata".to_string(),
            },
        });
    }
    let severity = parse_severity(&dto.severity, &ctx)?;
    check_range(&ctx, dto.min_length, dto.max_length)?;

    let mut rule = TextRule::new(severity);
    rule.required = dto.required;
    rule.min_length = dto.min_length;
    rule.max_length = dto.max_length;
    rule.pattern = dto
        .pattern
        .as_deref()
        .map(|p| compile(p, &format!("{ctx}.pattern")))
        .transpose()?;
    Ok(MetadataAttributeRule::new(dto.name, rule))
}

fn convert_section(
    builder: &mut RuleModelBuilder,
    parent: Option<SectionId>,
    dto: SectionDto,
    ctx: &str,
) -> Result<SectionId, LoadError> {
    let severity = match dto.severity.as_deref() {
        Some(s) => parse_severity(s, &format!("{ctx}.severity"))?,
        None => Severity::Error,
    };

    let mut rule = SectionRule::new(dto.name, dto.level, severity);
    if let Some(order) = dto.order {
        rule = rule.with_order(order);
    }
    if let Some(occurrence) = dto.occurrence {
        rule = rule.with_occurrence(convert_occurrence(
            &occurrence,
            severity,
            &format!("{ctx}.occurrence"),
        )?);
    }
    if let Some(title) = dto.title {
        rule = rule.with_title(text_rule(&title, severity, &format!("{ctx}.title"))?);
    }
    for (i, block) in dto.blocks.into_iter().enumerate() {
        rule = rule.with_block(convert_block(block, severity, &format!("{ctx}.blocks[{i}]"))?);
    }

    let id = match parent {
        Some(parent) => builder.add_child(parent, rule),
        None => builder.add_root(rule),
    };
    for (i, child) in dto.subsections.into_iter().enumerate() {
        convert_section(builder, Some(id), child, &format!("{ctx}.subsections[{i}]"))?;
    }
    Ok(id)
}

fn convert_occurrence(
    dto: &OccurrenceDto,
    inherited: Severity,
    ctx: &str,
) -> Result<Occurrence, LoadError> {
    let severity = field_severity(dto.severity.as_deref(), inherited, ctx)?;
    check_range(ctx, Some(dto.min), dto.max)?;
    Ok(Occurrence::new(dto.min, dto.max, severity))
}

// ────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────

fn convert_block(dto: BlockDto, inherited: Severity, ctx: &str) -> Result<BlockRule, LoadError> {
    let kind = BlockKind::from_tag(&dto.kind).ok_or_else(|| LoadError::UnknownBlockKind {
        context: format!("{ctx}.kind"),
        kind: dto.kind.clone(),
    })?;
    let severity = field_severity(dto.severity.as_deref(), inherited, ctx)?;

    let mut fields = FieldReader::new(dto.fields, severity, ctx, kind);
    let constraints = match kind {
        BlockKind::Paragraph => BlockConstraints::Paragraph(ParagraphRules {
            lines: fields.count("lines")?,
            sentences: fields.sentences("sentences")?,
            content: fields.text("content")?,
        }),
        BlockKind::Listing => BlockConstraints::Listing(ListingRules {
            language: fields.values("language")?,
            title: fields.text("title")?,
            lines: fields.count("lines")?,
            callouts: fields.count("callouts")?,
        }),
        BlockKind::Literal => BlockConstraints::Literal(LiteralRules {
            title: fields.text("title")?,
            lines: fields.count("lines")?,
        }),
        BlockKind::Table => BlockConstraints::Table(TableRules {
            columns: fields.count("columns")?,
            rows: fields.count("rows")?,
            header: fields.text("header")?,
            caption: fields.text("caption")?,
        }),
        BlockKind::Image => BlockConstraints::Image(ImageRules {
            url: fields.text("url")?,
            alt: fields.text("alt")?,
            width: fields.numeric("width")?,
            height: fields.numeric("height")?,
        }),
        BlockKind::Audio => BlockConstraints::Audio(AudioRules {
            url: fields.text("url")?,
            title: fields.text("title")?,
            options: fields.values("options")?,
        }),
        BlockKind::Video => BlockConstraints::Video(VideoRules {
            url: fields.text("url")?,
            width: fields.numeric("width")?,
            height: fields.numeric("height")?,
            poster: fields.text("poster")?,
            caption: fields.text("caption")?,
        }),
        BlockKind::Admonition => BlockConstraints::Admonition(AdmonitionRules {
            variant: fields.values("variant")?,
            title: fields.text("title")?,
            content: fields.text("content")?,
        }),
        BlockKind::Quote | BlockKind::Verse => {
            let rules = QuoteRules {
                attribution: fields.text("attribution")?,
                citation: fields.text("citation")?,
                content: fields.text("content")?,
            };
            if kind == BlockKind::Quote {
                BlockConstraints::Quote(rules)
            } else {
                BlockConstraints::Verse(rules)
            }
        }
        BlockKind::Sidebar => BlockConstraints::Sidebar(SidebarRules {
            title: fields.text("title")?,
            content: fields.text("content")?,
        }),
        BlockKind::Example => BlockConstraints::Example(ExampleRules {
            title: fields.text("title")?,
            content: fields.text("content")?,
            collapsible: fields.values("collapsible")?,
        }),
        BlockKind::Pass => BlockConstraints::Pass(PassRules {
            content: fields.text("content")?,
            reason: fields.text("reason")?,
        }),
        BlockKind::Ulist | BlockKind::Olist => {
            let rules = ListRules {
                items: fields.count("items")?,
                nesting: fields.count("nesting")?,
                item: fields.text("item")?,
                marker: fields.values("marker")?,
            };
            if kind == BlockKind::Ulist {
                BlockConstraints::Ulist(rules)
            } else {
                BlockConstraints::Olist(rules)
            }
        }
        BlockKind::Dlist => BlockConstraints::Dlist(DlistRules {
            terms: fields.count("terms")?,
            term: fields.text("term")?,
            description: fields.text("description")?,
        }),
    };
    fields.finish()?;

    let mut rule = BlockRule::new(constraints, severity);
    if let Some(name) = dto.name {
        rule = rule.with_name(name);
    }
    if let Some(order) = dto.order {
        rule = rule.with_order(order);
    }
    if let Some(occurrence) = dto.occurrence {
        rule = rule.with_occurrence(convert_occurrence(
            &occurrence,
            severity,
            &format!("{ctx}.occurrence"),
        )?);
    }
    Ok(rule)
}

/// Takes constraint fields out of a block's key map by name.
///
/// Whatever is left when [`FieldReader::finish`] runs is not part of the
/// kind's vocabulary.
struct FieldReader<'a> {
    fields: BTreeMap<String, FieldDto>,
    severity: Severity,
    ctx: &'a str,
    kind: BlockKind,
}

impl<'a> FieldReader<'a> {
    fn new(
        fields: BTreeMap<String, FieldDto>,
        severity: Severity,
        ctx: &'a str,
        kind: BlockKind,
    ) -> Self {
        Self {
            fields,
            severity,
            ctx,
            kind,
        }
    }

    fn take(&mut self, name: &str) -> Option<(FieldDto, String)> {
        self.fields
            .remove(name)
            .map(|dto| (dto, format!("{}.{name}", self.ctx)))
    }

    fn text(&mut self, name: &str) -> Result<Option<TextRule>, LoadError> {
        self.take(name)
            .map(|(dto, ctx)| text_rule(&dto, self.severity, &ctx))
            .transpose()
    }

    fn count(&mut self, name: &str) -> Result<Option<CountRule>, LoadError> {
        self.take(name)
            .map(|(dto, ctx)| count_rule(&dto, self.severity, &ctx, &["min", "max", "severity"]))
            .transpose()
    }

    fn numeric(&mut self, name: &str) -> Result<Option<NumericRule>, LoadError> {
        self.take(name)
            .map(|(dto, ctx)| {
                only_keys(
                    &dto,
                    &ctx,
                    "numeric constraint",
                    &["required", "min", "max", "severity"],
                )?;
                let severity = field_severity(dto.severity.as_deref(), self.severity, &ctx)?;
                check_range(&ctx, dto.min.map(to_usize), dto.max.map(to_usize))?;
                let mut rule = NumericRule::new(dto.min, dto.max, severity);
                rule.required = dto.required.unwrap_or(false);
                Ok(rule)
            })
            .transpose()
    }

    fn values(&mut self, name: &str) -> Result<Option<ValueSet>, LoadError> {
        self.take(name)
            .map(|(dto, ctx)| {
                only_keys(&dto, &ctx, "value set", &["required", "allowed", "severity"])?;
                let severity = field_severity(dto.severity.as_deref(), self.severity, &ctx)?;
                let mut set = ValueSet::new(dto.allowed.unwrap_or_default(), severity);
                set.required = dto.required.unwrap_or(false);
                Ok(set)
            })
            .transpose()
    }

    fn sentences(&mut self, name: &str) -> Result<Option<SentenceRule>, LoadError> {
        self.take(name)
            .map(|(dto, ctx)| {
                let severity = field_severity(dto.severity.as_deref(), self.severity, &ctx)?;
                let count = if dto.min.is_some() || dto.max.is_some() {
                    Some(count_rule(
                        &dto,
                        self.severity,
                        &ctx,
                        &["min", "max", "words", "severity"],
                    )?)
                } else {
                    only_keys(&dto, &ctx, "sentence constraint", &["words", "severity"])?;
                    None
                };
                let words = dto
                    .words
                    .as_deref()
                    .map(|w| {
                        let words_ctx = format!("{ctx}.words");
                        count_rule(w, severity, &words_ctx, &["min", "max", "severity"])
                    })
                    .transpose()?;
                Ok(SentenceRule { count, words })
            })
            .transpose()
    }

    fn finish(self) -> Result<(), LoadError> {
        match self.fields.into_keys().next() {
            Some(key) => Err(LoadError::UnknownField {
                context: self.ctx.to_string(),
                key,
                owner: format!("block kind `{}`", self.kind),
            }),
            None => Ok(()),
        }
    }
}

// ────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────

fn text_rule(dto: &FieldDto, inherited: Severity, ctx: &str) -> Result<TextRule, LoadError> {
    only_keys(
        dto,
        ctx,
        "text constraint",
        &[
            "required",
            "min-length",
            "max-length",
            "pattern",
            "forbidden",
            "severity",
        ],
    )?;
    let severity = field_severity(dto.severity.as_deref(), inherited, ctx)?;
    check_range(ctx, dto.min_length, dto.max_length)?;

    let mut rule = TextRule::new(severity);
    rule.required = dto.required.unwrap_or(false);
    rule.min_length = dto.min_length;
    rule.max_length = dto.max_length;
    rule.pattern = dto
        .pattern
        .as_deref()
        .map(|p| compile(p, &format!("{ctx}.pattern")))
        .transpose()?;
    rule.forbidden = dto
        .forbidden
        .as_deref()
        .map(|p| compile(p, &format!("{ctx}.forbidden")))
        .transpose()?;
    Ok(rule)
}

fn count_rule(
    dto: &FieldDto,
    inherited: Severity,
    ctx: &str,
    allowed: &[&str],
) -> Result<CountRule, LoadError> {
    only_keys(dto, ctx, "count constraint", allowed)?;
    let severity = field_severity(dto.severity.as_deref(), inherited, ctx)?;
    let (min, max) = (dto.min.map(to_usize), dto.max.map(to_usize));
    check_range(ctx, min, max)?;
    Ok(CountRule::new(min, max, severity))
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn only_keys(dto: &FieldDto, ctx: &str, owner: &str, allowed: &[&str]) -> Result<(), LoadError> {
    match dto.present_keys().into_iter().find(|k| !allowed.contains(k)) {
        Some(key) => Err(LoadError::UnknownField {
            context: ctx.to_string(),
            key: key.to_string(),
            owner: owner.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_range(ctx: &str, min: Option<usize>, max: Option<usize>) -> Result<(), LoadError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(LoadError::InvalidRange {
                context: ctx.to_string(),
                min,
                max,
            });
        }
    }
    Ok(())
}

fn compile(pattern: &str, ctx: &str) -> Result<Pattern, LoadError> {
    Pattern::new(pattern).map_err(|e| LoadError::Validation {
        context: ctx.to_string(),
        source: e,
    })
}

fn field_severity(
    value: Option<&str>,
    inherited: Severity,
    ctx: &str,
) -> Result<Severity, LoadError> {
    value.map_or(Ok(inherited), |s| parse_severity(s, ctx))
}

fn parse_severity(s: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(s).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: s.to_string(),
    })
}
