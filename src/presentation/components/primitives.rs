use crate::application::view_models::StatusIndicator;
use crate::formatting::{NumberFormat, Tone};
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Tiny,
    Small,
    #[default]
    Body,
    Large,
}

impl TextSize {
    pub fn class(self) -> &'static str {
        match self {
            TextSize::Tiny => "text-tiny",
            TextSize::Small => "text-small",
            TextSize::Body => "text-body",
            TextSize::Large => "text-large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextColor {
    #[default]
    Default,
    Subtle,
    Muted,
    Primary,
}

impl TextColor {
    pub fn class(self) -> &'static str {
        match self {
            TextColor::Default => "color-default",
            TextColor::Subtle => "color-subtle",
            TextColor::Muted => "color-muted",
            TextColor::Primary => "color-primary",
        }
    }
}

/// Sized, coloured text; `inline` renders a `<span>` instead of a `<p>`.
#[component]
pub fn Text(
    #[prop(optional)] size: TextSize,
    #[prop(optional)] color: TextColor,
    #[prop(optional)] inline: bool,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let class = format!("text {} {} {}", size.class(), color.class(), class);
    if inline {
        view! { <span class=class>{children()}</span> }.into_view()
    } else {
        view! { <p class=class>{children()}</p> }.into_view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl NumberSize {
    fn class(self) -> &'static str {
        match self {
            NumberSize::Small => "number-small",
            NumberSize::Medium => "number-medium",
            NumberSize::Large => "number-large",
        }
    }
}

pub fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "tone-positive",
        Tone::Negative => "tone-negative",
        Tone::Neutral => "tone-neutral",
    }
}

/// Formatted number, tinted by sign for currency and percent.
#[component]
pub fn Number(
    #[prop(into)] value: MaybeSignal<f64>,
    #[prop(optional)] format: NumberFormat,
    #[prop(optional)] size: NumberSize,
) -> impl IntoView {
    let class = {
        let value = value.clone();
        move || format!("number {} {}", size.class(), tone_class(format.tone(value.get())))
    };
    view! { <span class=class>{move || format.format(value.get())}</span> }
}

/// Coloured dot with a label and an optional two-line info text.
#[component]
pub fn Status(#[prop(into)] indicator: MaybeSignal<StatusIndicator>) -> impl IntoView {
    move || {
        let indicator = indicator.get();
        let dot = format!(
            "status-dot {}{}",
            indicator.color.dot_class(),
            if indicator.pulse { " pulse" } else { "" }
        );
        let (caption, value) = indicator.info_parts();
        let caption = caption.map(|caption| view! { <span class="status-caption">{caption.to_string()}</span> });
        let value = value.to_string();
        view! {
            <div class="status">
                <span class=dot></span>
                <div class="status-text">
                    <span class="status-label">{indicator.label.clone()}</span>
                    {caption}
                    <span class="status-info">{value}</span>
                </div>
            </div>
        }
    }
}

/// Pulsing placeholder shown while a feed loads.
#[component]
pub fn Skeleton(#[prop(default = 2)] blocks: usize) -> impl IntoView {
    view! {
        <div class="skeleton">
            {(0..blocks).map(|_| view! { <div class="skeleton-block"></div> }).collect_view()}
        </div>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Warning,
}

/// Inline error or empty-state message.
#[component]
pub fn Notice(kind: NoticeKind, #[prop(into)] message: String) -> impl IntoView {
    let class = match kind {
        NoticeKind::Error => "notice notice-error",
        NoticeKind::Warning => "notice notice-warning",
    };
    view! { <div class=class>{message}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones_map_to_distinct_classes() {
        assert_eq!(tone_class(NumberFormat::Currency.tone(-1.0)), "tone-negative");
        assert_eq!(tone_class(NumberFormat::Percent.tone(0.2)), "tone-positive");
        assert_eq!(tone_class(NumberFormat::Number.tone(-1.0)), "tone-neutral");
    }
}
