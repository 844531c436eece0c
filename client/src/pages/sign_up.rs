//! Sign-up page: account details, then the emailed one-time code.
//!
//! The `SignupFlow` state machine lives in a signal. Each async step works on
//! a copy and writes it back, so a step abandoned by navigating away never
//! touches the signal. A finished sign-up still reaches the auth context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use medportal::role::SIGN_IN_PATH;
use medportal::{SignupFlow, SignupRequest, SignupStep};

use crate::state::auth::AuthContext;
use crate::util::auth::{install_redirect, signed_in_destination};

#[derive(Clone, Copy)]
struct DetailsForm {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
}

impl DetailsForm {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    fn request(self) -> SignupRequest {
        SignupRequest {
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
        }
    }

    fn prefill(self, request: SignupRequest) {
        self.first_name.set(request.first_name);
        self.last_name.set(request.last_name);
        self.email.set(request.email);
        self.password.set(request.password);
    }
}

#[derive(Clone, Copy)]
enum Action {
    SubmitDetails,
    Resend,
    Verify,
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let session = auth.session();
    let navigate = use_navigate();

    let flow = RwSignal::new(SignupFlow::new());
    let form = DetailsForm::new();
    let code = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    install_redirect(move || signed_in_destination(&session.get(), None), navigate.clone());

    let alive = Arc::new(AtomicBool::new(true));
    let alive_cleanup = Arc::clone(&alive);
    on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

    let run = move |action: Action| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let auth = auth.clone();
        let alive = Arc::clone(&alive);
        let navigate = navigate.clone();
        let typed_code = code.get_untracked();
        leptos::task::spawn_local(async move {
            let mut next = flow.get_untracked();
            let result = match action {
                Action::SubmitDetails => next.submit_details(auth.store().gateway(), form.request()).await,
                Action::Resend => next.resend_otp(auth.store().gateway()).await,
                Action::Verify => auth.verify_signup(&mut next, &typed_code).await.map(|_| ()),
            };
            if !alive.load(Ordering::Relaxed) {
                return;
            }
            if let Err(e) = &result {
                log::warn!("sign-up step failed: {e}");
            }
            busy.set(false);
            let target = next.redirect_target();
            flow.set(next);
            if let Some(target) = target {
                navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        });
    };
    let run = StoredValue::new_local(run);

    let on_details = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        run.with_value(|run| run(Action::SubmitDetails));
    };
    let on_verify = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        run.with_value(|run| run(Action::Verify));
    };
    let on_resend = move |_| run.with_value(|run| run(Action::Resend));
    let on_edit = move |_| {
        let mut next = flow.get_untracked();
        if let Some(request) = next.edit_details() {
            form.prefill(request);
        }
        code.set(String::new());
        flow.set(next);
    };

    let verifying = move || matches!(flow.get().step(), SignupStep::AwaitingVerification { .. });
    let message = move || flow.get().message().map(str::to_owned);
    let pending_email = move || flow.get().pending_email().map(str::to_owned).unwrap_or_default();

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"MedPortal"</h1>
                <Show
                    when=verifying
                    fallback=move || {
                        view! {
                            <p class="auth-card__subtitle">"Create your patient account"</p>
                            <form class="auth-form" on:submit=on_details>
                                <input
                                    class="auth-input"
                                    placeholder="First name"
                                    prop:value=move || form.first_name.get()
                                    on:input=move |ev| form.first_name.set(event_target_value(&ev))
                                />
                                <input
                                    class="auth-input"
                                    placeholder="Last name"
                                    prop:value=move || form.last_name.get()
                                    on:input=move |ev| form.last_name.set(event_target_value(&ev))
                                />
                                <input
                                    class="auth-input"
                                    type="email"
                                    placeholder="you@example.com"
                                    prop:value=move || form.email.get()
                                    on:input=move |ev| form.email.set(event_target_value(&ev))
                                />
                                <input
                                    class="auth-input"
                                    type="password"
                                    placeholder="Password (6+ characters)"
                                    prop:value=move || form.password.get()
                                    on:input=move |ev| form.password.set(event_target_value(&ev))
                                />
                                <button class="auth-button" type="submit" disabled=move || busy.get()>
                                    "Send Verification Code"
                                </button>
                            </form>
                        }
                    }
                >
                    <p class="auth-card__subtitle">
                        "Enter the 6-digit code sent to " <strong>{pending_email}</strong>
                    </p>
                    <form class="auth-form" on:submit=on_verify>
                        <input
                            class="auth-input auth-input--code"
                            inputmode="numeric"
                            maxlength="6"
                            placeholder="123456"
                            prop:value=move || code.get()
                            on:input=move |ev| code.set(event_target_value(&ev))
                        />
                        <button class="auth-button" type="submit" disabled=move || busy.get()>
                            "Verify & Create Account"
                        </button>
                    </form>
                    <div class="auth-actions">
                        <button class="auth-link" on:click=on_resend disabled=move || busy.get()>
                            "Resend code"
                        </button>
                        <button class="auth-link" on:click=on_edit disabled=move || busy.get()>
                            "Change details"
                        </button>
                    </div>
                </Show>
                <Show when=move || message().is_some()>
                    <p class="auth-message">{move || message().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Already registered? "
                    <a href=SIGN_IN_PATH>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
