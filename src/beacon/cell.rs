use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use serde_json::Value;

use crate::beacon::format::{AttributeKind, Line, PLACEHOLDER, Rendered};
use crate::config::Theme;

/// Presentational form of a formatted attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", content = "content", rename_all = "lowercase")]
pub enum CellWidget {
    /// Nothing to show.
    Placeholder,
    /// Exactly one line.
    Inline(String),
    /// Two or more lines, shown as a bulleted list.
    List(Vec<Line>),
}

impl CellWidget {
    /// One line renders inline, several render as a list.
    pub fn from_rendered(rendered: Rendered) -> Self {
        let mut lines = rendered.lines().to_vec();
        match lines.len() {
            0 => CellWidget::Placeholder,
            1 => CellWidget::Inline(lines.remove(0).text),
            _ => CellWidget::List(lines),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, CellWidget::List(_))
    }

    /// HTML fragment for a table cell or detail field.
    pub fn to_html(&self, theme: &Theme) -> String {
        match self {
            CellWidget::Placeholder => format!(
                "<span class=\"cell-empty\" style=\"color: {}\">{}</span>",
                encode_double_quoted_attribute(&theme.muted),
                PLACEHOLDER
            ),
            CellWidget::Inline(text) => {
                format!("<span class=\"cell-inline\">{}</span>", encode_text(text))
            }
            CellWidget::List(lines) => list_html(lines, theme),
        }
    }
}

fn list_html(lines: &[Line], theme: &Theme) -> String {
    let mut html = format!(
        "<ul class=\"cell-list\" style=\"--marker-color: {}\">",
        encode_double_quoted_attribute(&theme.primary)
    );
    let mut depth = 0;

    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            if line.depth > depth {
                for _ in depth..line.depth {
                    html.push_str("<ul>");
                }
            } else {
                html.push_str("</li>");
                for _ in line.depth..depth {
                    html.push_str("</ul></li>");
                }
            }
        } else {
            for _ in 0..line.depth {
                html.push_str("<ul>");
            }
        }
        depth = line.depth;
        html.push_str("<li>");
        html.push_str(&encode_text(&line.text));
    }

    html.push_str("</li>");
    for _ in 0..depth {
        html.push_str("</ul></li>");
    }
    html.push_str("</ul>");
    html
}

impl AttributeKind {
    /// Run the formatter and wrap its output as a widget.
    pub fn cell(self, value: &Value) -> CellWidget {
        CellWidget::from_rendered(self.render(value))
    }
}

pub fn info_cell(value: &Value) -> CellWidget {
    AttributeKind::Info.cell(value)
}

pub fn variation_cell(value: &Value) -> CellWidget {
    AttributeKind::Variation.cell(value)
}

pub fn measures_cell(value: &Value) -> CellWidget {
    AttributeKind::Measures.cell(value)
}

pub fn interventions_cell(value: &Value) -> CellWidget {
    AttributeKind::InterventionsOrProcedures.cell(value)
}

pub fn molecular_attributes_cell(value: &Value) -> CellWidget {
    AttributeKind::MolecularAttributes.cell(value)
}

pub fn case_level_data_cell(value: &Value) -> CellWidget {
    AttributeKind::CaseLevelData.cell(value)
}
