use leptos::prelude::*;

/// Каркас страницы: sticky header над областью контента.
///
/// ```text
/// +----------------------+
/// |   header (sticky)    |
/// +----------------------+
/// |      children        |
/// +----------------------+
/// ```
#[component]
pub fn PageShell(children: Children) -> impl IntoView {
    view! {
        <div class="flex flex-col min-h-full w-full max-w-3xl mx-auto px-4">
            <header class="sticky top-0 shrink-0 z-20 bg-[#1E1E1E]">
                <div class="flex flex-col h-full w-full gap-1 pt-4 pb-2"></div>
            </header>
            {children()}
        </div>
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    const VOID_ELEMENTS: [&str; 6] = ["area", "br", "hr", "img", "input", "meta"];

    /// Имена элементов верхнего уровня в отрендеренном HTML (маркеры `<!...>` пропускаются)
    pub fn top_level_elements(html: &str) -> Vec<String> {
        let mut roots = Vec::new();
        let mut depth = 0usize;
        let mut rest = html;

        while let Some(start) = rest.find('<') {
            let tail = &rest[start..];
            let end = tail.find('>').map(|i| i + 1).unwrap_or(tail.len());
            let token = &tail[..end];
            rest = &tail[end..];

            if token.starts_with("<!") {
                continue;
            }
            if token.starts_with("</") {
                depth = depth.saturating_sub(1);
                continue;
            }

            let name: String = token[1..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            if depth == 0 {
                roots.push(name.clone());
            }
            if !token.ends_with("/>") && !VOID_ELEMENTS.contains(&name.as_str()) {
                depth += 1;
            }
        }
        roots
    }
}
