use leptos::*;

/// Body class of a [`Panel`]: a 2, 3 or 4 column grid, or a plain stack.
pub fn body_class(grid: bool, columns: u8) -> &'static str {
    if !grid {
        return "panel-body";
    }
    match columns {
        0..=2 => "panel-body grid grid-2",
        3 => "panel-body grid grid-3",
        _ => "panel-body grid grid-4",
    }
}

/// Card with optional header and footer slots.
#[component]
pub fn Panel(
    #[prop(optional, into)] header: Option<ViewFn>,
    #[prop(optional, into)] footer: Option<ViewFn>,
    #[prop(optional)] grid: bool,
    #[prop(default = 3)] columns: u8,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    view! {
        <section class=format!("panel {}", class)>
            {header.map(|header| view! { <div class="panel-header">{header.run()}</div> })}
            <div class=body_class(grid, columns)>{children()}</div>
            {footer.map(|footer| view! { <div class="panel-footer">{footer.run()}</div> })}
        </section>
    }
}
