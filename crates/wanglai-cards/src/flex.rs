// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed builder for Flex Message container trees.
//!
//! Only the properties the bot's cards use are modelled. Every optional
//! property is skipped during serialization when unset, so the JSON that
//! reaches the platform contains exactly what the builder was told.

use serde::Serialize;
use serde_json::Value;

/// Any node that can appear inside a box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Box(FlexBox),
    Text(Text),
    Separator(Separator),
    Button(Button),
}

impl From<FlexBox> for Component {
    fn from(value: FlexBox) -> Self {
        Component::Box(value)
    }
}

impl From<Text> for Component {
    fn from(value: Text) -> Self {
        Component::Text(value)
    }
}

impl From<Separator> for Component {
    fn from(value: Separator) -> Self {
        Component::Separator(value)
    }
}

impl From<Button> for Component {
    fn from(value: Button) -> Self {
        Component::Button(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
    Baseline,
}

/// A layout box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexBox {
    #[serde(rename = "type")]
    kind: &'static str,
    pub layout: Layout,
    pub contents: Vec<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_all: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
}

impl FlexBox {
    pub fn new(layout: Layout) -> Self {
        Self {
            kind: "box",
            layout,
            contents: Vec::new(),
            flex: None,
            spacing: None,
            margin: None,
            width: None,
            height: None,
            padding_all: None,
            padding_top: None,
            padding_bottom: None,
            padding_start: None,
            padding_end: None,
            background_color: None,
            corner_radius: None,
            justify_content: None,
            align_items: None,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Layout::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Layout::Horizontal)
    }

    pub fn baseline() -> Self {
        Self::new(Layout::Baseline)
    }

    pub fn push(mut self, component: impl Into<Component>) -> Self {
        self.contents.push(component.into());
        self
    }

    pub fn extend<C: Into<Component>>(mut self, components: impl IntoIterator<Item = C>) -> Self {
        self.contents.extend(components.into_iter().map(Into::into));
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn spacing(mut self, spacing: &str) -> Self {
        self.spacing = Some(spacing.to_string());
        self
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: &str) -> Self {
        self.height = Some(height.to_string());
        self
    }

    pub fn padding_all(mut self, padding: &str) -> Self {
        self.padding_all = Some(padding.to_string());
        self
    }

    /// Sets top and bottom padding together.
    pub fn padding_y(mut self, padding: &str) -> Self {
        self.padding_top = Some(padding.to_string());
        self.padding_bottom = Some(padding.to_string());
        self
    }

    /// Sets start and end padding together.
    pub fn padding_x(mut self, padding: &str) -> Self {
        self.padding_start = Some(padding.to_string());
        self.padding_end = Some(padding.to_string());
        self
    }

    pub fn padding_bottom(mut self, padding: &str) -> Self {
        self.padding_bottom = Some(padding.to_string());
        self
    }

    pub fn background(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_string());
        self
    }

    pub fn corner_radius(mut self, radius: &str) -> Self {
        self.corner_radius = Some(radius.to_string());
        self
    }

    pub fn justify_content(mut self, value: &str) -> Self {
        self.justify_content = Some(value.to_string());
        self
    }

    pub fn align_items(mut self, value: &str) -> Self {
        self.align_items = Some(value.to_string());
        self
    }
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjust_mode: Option<String>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
            size: None,
            weight: None,
            color: None,
            wrap: None,
            flex: None,
            margin: None,
            align: None,
            gravity: None,
            adjust_mode: None,
        }
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some("bold".to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    pub fn align(mut self, align: &str) -> Self {
        self.align = Some(align.to_string());
        self
    }

    pub fn gravity(mut self, gravity: &str) -> Self {
        self.gravity = Some(gravity.to_string());
        self
    }

    /// Keeps the text on one line by scaling the font down as needed.
    pub fn shrink_to_fit(mut self) -> Self {
        self.adjust_mode = Some("shrink-to-fit".to_string());
        self.wrap = Some(false);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Separator {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Separator {
    pub fn new() -> Self {
        Self {
            kind: "separator",
            margin: None,
            color: None,
        }
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::new()
    }
}

/// An action that opens a URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UriAction {
    #[serde(rename = "type")]
    kind: &'static str,
    pub label: String,
    pub uri: String,
}

impl UriAction {
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind: "uri",
            label: label.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    #[serde(rename = "type")]
    kind: &'static str,
    pub action: UriAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl Button {
    pub fn new(action: UriAction) -> Self {
        Self {
            kind: "button",
            action,
            style: None,
            color: None,
            height: None,
        }
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn height(mut self, height: &str) -> Self {
        self.height = Some(height.to_string());
        self
    }
}

/// A single card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<FlexBox>,
    pub body: FlexBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FlexBox>,
}

impl Bubble {
    pub fn new(body: FlexBox) -> Self {
        Self {
            kind: "bubble",
            size: None,
            header: None,
            body,
            footer: None,
        }
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn header(mut self, header: FlexBox) -> Self {
        self.header = Some(header);
        self
    }

    pub fn footer(mut self, footer: FlexBox) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A horizontally scrolling row of bubbles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carousel {
    #[serde(rename = "type")]
    kind: &'static str,
    pub contents: Vec<Bubble>,
}

impl Carousel {
    pub fn new(contents: Vec<Bubble>) -> Self {
        Self {
            kind: "carousel",
            contents,
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// An empty box that keeps a grid row aligned.
pub fn spacer_cell(background: Option<&str>) -> FlexBox {
    let cell = FlexBox::horizontal().flex(1);
    match background {
        Some(color) => cell.background(color),
        None => cell,
    }
}
