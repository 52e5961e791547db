use crate::domain::a001_conversation::ui::chatbot::Chatbot;
use crate::layout::PageShell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <PageShell>
            <Chatbot />
        </PageShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::top_level_elements;
    use leptos::tachys::view::RenderHtml;

    fn render_app() -> String {
        // эффекты уходят в локальный пул и в тесте не запускаются
        let _ = any_spawner::Executor::init_futures_executor();
        Owner::new().with(|| view! { <App /> }.to_html())
    }

    #[test]
    fn test_app_is_one_shell_with_chatbot() {
        let html = render_app();
        assert_eq!(top_level_elements(&html), vec!["div"]);
        assert_eq!(html.matches("<header").count(), 1);

        let header_end = html.find("</header>").unwrap();
        let input_at = html.find("<textarea").unwrap();
        assert!(header_end < input_at);
        assert!(html.contains("New chat"));
        assert!(html.contains("Send"));
    }
}
