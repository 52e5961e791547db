//! Chatbot - View Component

use super::model::{fetch_status, submit};
use super::view_model::{stage_label, ChatbotVm};
use leptos::prelude::*;
use thaw::{Flex, FlexAlign, FlexJustify};

#[component]
#[allow(non_snake_case)]
pub fn Chatbot() -> impl IntoView {
    let vm = ChatbotVm::new();
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();

    // Scroll to bottom helper
    let scroll_to_bottom = move || {
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    };

    // Восстановить текущий диалог с сервера
    Effect::new(move |_| {
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_status().await {
                Ok(status) => {
                    vm.restore(status);
                    scroll_to_bottom();
                }
                Err(e) => log::warn!("Failed to fetch pipeline status: {}", e),
            }
        });
    });

    let handle_send = Callback::new(move |_| {
        let Some(query) = vm.begin_send() else {
            return;
        };
        scroll_to_bottom();

        let target = vm.submit_target();
        wasm_bindgen_futures::spawn_local(async move {
            match submit(target, &query).await {
                Ok(response) => {
                    vm.apply_response(response);
                    scroll_to_bottom();
                }
                Err(e) => {
                    log::error!("Pipeline request failed: {}", e);
                    vm.fail(&query, e);
                }
            }
        });
    });

    view! {
        <div class="flex flex-col flex-1 w-full gap-3 pb-4">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <span style="color: var(--colorNeutralForeground3); font-size: 13px;">
                    {move || vm.stage.get().map(stage_label).unwrap_or_default()}
                </span>
                <button
                    class="px-3 py-1 text-sm rounded-md border border-gray-500 disabled:opacity-50"
                    disabled=move || vm.is_sending.get()
                    on:click=move |_| vm.reset()
                >
                    "New chat"
                </button>
            </Flex>

            // Error display
            {move || {
                vm.error
                    .get()
                    .map(|e| {
                        view! {
                            <div style="padding: 12px; background: var(--color-error-50); border: 1px solid var(--color-error-100); border-radius: 8px;">
                                <span style="color: var(--color-error);">{e}</span>
                            </div>
                        }
                    })
            }}

            // Messages area
            <div
                node_ref=messages_container_ref
                class="flex-1"
                style="overflow-y: auto; display: flex; flex-direction: column; gap: 12px; padding: 12px;"
            >
                <For
                    each=move || vm.messages.get().into_iter().enumerate()
                    key=|(i, msg)| (*i, msg.timestamp.timestamp_millis())
                    let:item
                >
                    {{
                        let (_, msg) = item;
                        let is_user = msg.is_user();
                        view! {
                            <div
                                style=if is_user {
                                    "align-self: flex-end; max-width: 80%;"
                                } else {
                                    "align-self: flex-start; max-width: 80%;"
                                }
                            >
                                <div
                                    style=if is_user {
                                        "background: var(--colorBrandBackground2); padding: 10px 14px; border-radius: 12px;"
                                    } else {
                                        "background: var(--colorNeutralBackground2); padding: 10px 14px; border-radius: 12px;"
                                    }
                                >
                                    <div style="white-space: pre-wrap;">{msg.content}</div>
                                </div>
                            </div>
                        }
                    }}
                </For>
            </div>

            // Input area
            <Flex style="gap: 8px; align-items: flex-end;">
                <div style="flex: 1;">
                    <textarea
                        class="rounded-md bg-[#2A2A2A] p-2 text-white"
                        placeholder="Ask about a scheme... (Shift+Enter for a new line)"
                        style="width: 100%; min-height: 60px; max-height: 200px; resize: vertical;"
                        disabled=move || vm.is_sending.get()
                        prop:value=move || vm.draft.get()
                        on:input=move |ev| vm.draft.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                handle_send.run(());
                            }
                        }
                    ></textarea>
                </div>

                <button
                    class="px-4 py-2 rounded-md bg-blue-600 text-white disabled:opacity-50"
                    disabled=move || vm.is_sending.get()
                    on:click=move |_| handle_send.run(())
                >
                    {move || if vm.is_sending.get() { "Sending..." } else { "Send" }}
                </button>
            </Flex>
        </div>
    }
}
