use crate::api::utils::api_get;
use crate::components::api_config_provider::use_api_config;
use web_sys::HtmlInputElement;
use yew::events::SubmitEvent;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Properties, PartialEq)]
pub struct ApiUrlSettingsProps {
    #[prop_or_default]
    pub class: Classes,
}

#[derive(Clone, PartialEq)]
enum HealthCheck {
    Idle,
    Checking,
    Ok,
    Failed(String),
}

/// Shows where the backend URL came from and lets the user correct it.
#[function_component(ApiUrlSettings)]
pub fn api_url_settings(props: &ApiUrlSettingsProps) -> Html {
    let draft = use_state(String::new);
    let health = use_state(|| HealthCheck::Idle);

    let config = match use_api_config() {
        Some(config) => config,
        None => {
            return html! {
                <div class={classes!("text-red-600", props.class.clone())}>
                    {"API settings are unavailable outside ApiConfigProvider"}
                </div>
            }
        }
    };

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let override_url = config.override_url.clone();
        let health = health.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let url = draft.trim().to_string();
            if url.is_empty() {
                return;
            }
            health.set(HealthCheck::Idle);
            override_url.emit(url);
        })
    };

    let onreset = {
        let reset = config.reset.clone();
        let draft = draft.clone();
        let health = health.clone();
        Callback::from(move |_: MouseEvent| {
            draft.set(String::new());
            health.set(HealthCheck::Idle);
            reset.emit(());
        })
    };

    let oncheck = {
        let base = config.base_url();
        let health = health.clone();
        Callback::from(move |_: MouseEvent| {
            let request = match api_get(&base, "/health") {
                Ok(request) => request,
                Err(e) => {
                    health.set(HealthCheck::Failed(e));
                    return;
                }
            };
            let health = health.clone();
            health.set(HealthCheck::Checking);
            spawn_local(async move {
                match request.send().await {
                    Ok(response) if response.ok() => health.set(HealthCheck::Ok),
                    Ok(response) => health.set(HealthCheck::Failed(format!("HTTP {}", response.status()))),
                    Err(e) => health.set(HealthCheck::Failed(e.to_string())),
                }
            });
        })
    };

    let state = &config.state;
    let status = if state.resolving {
        html! { <span class="text-gray-500">{"Resolving backend URL..."}</span> }
    } else if let Some(resolution) = &state.resolution {
        html! {
            <span>
                <code class="font-mono">{resolution.url.clone()}</code>
                <span class="ml-2 text-xs text-gray-500">{format!("({})", resolution.source)}</span>
                if resolution.source.is_guess() {
                    <p class="text-xs text-amber-600">
                        {"This address was guessed from the page's hostname. Enter the real backend URL if requests fail."}
                    </p>
                }
            </span>
        }
    } else if state.unconfigured {
        html! {
            <span class="text-red-600">
                {"No backend URL is configured. Enter one below or set apiUrl in config.json."}
            </span>
        }
    } else {
        html! { <span class="text-gray-500">{config.base_url()}</span> }
    };

    let health_view = match &*health {
        HealthCheck::Idle => html! {},
        HealthCheck::Checking => html! { <span class="text-gray-500">{"Checking..."}</span> },
        HealthCheck::Ok => html! { <span class="text-green-600">{"Backend reachable"}</span> },
        HealthCheck::Failed(e) => html! { <span class="text-red-600">{format!("Backend unreachable: {}", e)}</span> },
    };

    html! {
        <div class={classes!("space-y-3", props.class.clone())}>
            <div>
                <span class="font-semibold mr-2">{"Backend API:"}</span>
                {status}
            </div>
            if let Some(error) = &state.error {
                <div class="text-red-600 text-sm">{error.clone()}</div>
            }
            <form onsubmit={onsubmit} class="flex space-x-2">
                <input
                    type="url"
                    class="flex-1 border rounded px-2 py-1"
                    placeholder="https://your-backend.example.com"
                    value={(*draft).clone()}
                    oninput={oninput}
                />
                <button type="submit" class="px-3 py-1 rounded bg-blue-600 text-white">{"Save"}</button>
                <button type="button" class="px-3 py-1 rounded bg-gray-200" onclick={onreset}>{"Reset"}</button>
                <button type="button" class="px-3 py-1 rounded bg-gray-200" onclick={oncheck}>{"Check"}</button>
            </form>
            <div class="text-sm">{health_view}</div>
        </div>
    }
}
