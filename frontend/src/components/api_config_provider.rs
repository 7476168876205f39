use crate::browser::{clear_override_slot, set_override_slot};
use log::error;
use shared::{ApiUrlResolver, Resolution};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiConfigState {
    pub resolution: Option<Resolution>,
    pub resolving: bool,
    /// Resolution finished without finding a URL
    pub unconfigured: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ApiConfigAction {
    Resolving,
    Resolved(Option<Resolution>),
    Overridden(Resolution),
    Reset,
    Error(String),
}

impl Reducible for ApiConfigState {
    type Action = ApiConfigAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ApiConfigAction::Resolving => Rc::new(Self {
                resolving: true,
                error: None,
                ..(*self).clone()
            }),
            ApiConfigAction::Resolved(resolution) => Rc::new(Self {
                unconfigured: resolution.is_none(),
                resolution,
                resolving: false,
                error: None,
            }),
            ApiConfigAction::Overridden(resolution) => Rc::new(Self {
                resolution: Some(resolution),
                resolving: false,
                unconfigured: false,
                error: None,
            }),
            ApiConfigAction::Reset => Rc::new(Self::default()),
            ApiConfigAction::Error(error) => Rc::new(Self {
                error: Some(error),
                ..(*self).clone()
            }),
        }
    }
}

/// What consumers of the backend URL get from context.
#[derive(Clone)]
pub struct ApiConfigContext {
    pub resolver: Rc<ApiUrlResolver>,
    pub state: ApiConfigState,
    pub override_url: Callback<String>,
    pub reset: Callback<()>,
}

impl PartialEq for ApiConfigContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resolver, &other.resolver)
            && self.state == other.state
            && self.override_url == other.override_url
            && self.reset == other.reset
    }
}

impl ApiConfigContext {
    /// Base URL for requests right now.
    ///
    /// Empty once resolution has concluded that nothing is configured; while
    /// resolution is still running, the best synchronous guess.
    pub fn base_url(&self) -> String {
        match (&self.state.resolution, self.state.unconfigured) {
            (Some(resolution), _) => resolution.url.clone(),
            (None, true) => String::new(),
            (None, false) => self.resolver.current(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.state.resolving && (self.state.resolution.is_some() || self.state.unconfigured)
    }
}

#[derive(Properties, Clone, PartialEq)]
pub struct ApiConfigProviderProps {
    #[prop_or_default]
    pub children: Children,
}

fn spawn_resolution(resolver: Rc<ApiUrlResolver>, state: UseReducerHandle<ApiConfigState>) {
    spawn_local(async move {
        state.dispatch(ApiConfigAction::Resolving);
        let resolution = resolver.resolve_detailed().await;
        state.dispatch(ApiConfigAction::Resolved(resolution));
    });
}

#[function_component(ApiConfigProvider)]
pub fn api_config_provider(props: &ApiConfigProviderProps) -> Html {
    let resolver = (*use_state(crate::app_resolver)).clone();
    let state = use_reducer_eq(|| ApiConfigState {
        resolution: resolver.last_resolution(),
        ..Default::default()
    });

    // Resolve once on mount
    {
        let resolver = resolver.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            if state.resolution.is_none() {
                spawn_resolution(resolver, state);
            }
            || ()
        });
    }

    let override_url = {
        let resolver = resolver.clone();
        let state = state.clone();
        Callback::from(move |url: String| match resolver.override_url(&url) {
            Ok(resolution) => {
                set_override_slot(&resolution.url);
                state.dispatch(ApiConfigAction::Overridden(resolution));
            }
            Err(e) => {
                error!("Rejected API URL override '{}': {}", url, e);
                state.dispatch(ApiConfigAction::Error(e.to_string()));
            }
        })
    };

    let reset = {
        let resolver = resolver.clone();
        let state = state.clone();
        Callback::from(move |_: ()| {
            clear_override_slot();
            match resolver.forget() {
                Ok(()) => {
                    state.dispatch(ApiConfigAction::Reset);
                    spawn_resolution(resolver.clone(), state.clone());
                }
                Err(e) => {
                    error!("Failed to clear stored API URL: {}", e);
                    state.dispatch(ApiConfigAction::Error(e.to_string()));
                }
            }
        })
    };

    let context = ApiConfigContext {
        resolver,
        state: (*state).clone(),
        override_url,
        reset,
    };

    html! {
        <ContextProvider<ApiConfigContext> {context}>
            { for props.children.iter() }
        </ContextProvider<ApiConfigContext>>
    }
}

/// The backend URL context; `None` outside an [`ApiConfigProvider`].
#[hook]
pub fn use_api_config() -> Option<ApiConfigContext> {
    use_context::<ApiConfigContext>()
}
