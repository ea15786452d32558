//! Root application component with routing and context providers.
//!
//! The route table mirrors `AppRoute`: public screens at the top level, the
//! signed-in screens nested under one layout. Access is decided by
//! [`RouteGuard`] from each route's own guard chain.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{ParentRoute, Redirect, Route, Router, Routes},
};
use okr_portal::routes::AppRoute;

use crate::components::guards::RouteGuard;
use crate::components::layout::MainLayout;
use crate::pages::{
    accept_invitation::AcceptInvitationPage, admin_settings::AdminSettingsPage, auth_callback::AuthCallbackPage,
    dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage, section::SectionPage,
};
use crate::state::flash::Flash;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(Flash::default());

    view! {
        <Title text="OKR Portal"/>

        <Router>
            <RouteGuard>
                <Routes fallback=|| view! { <Redirect path=AppRoute::Root.href()/> }>
                    <Route
                        path=(StaticSegment("auth"), StaticSegment("microsoft"), StaticSegment("callback"))
                        view=AuthCallbackPage
                    />
                    <Route
                        path=(StaticSegment("invite"), StaticSegment("accept"), ParamSegment("token"))
                        view=AcceptInvitationPage
                    />
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("404") view=NotFoundPage/>
                    <Route path=StaticSegment("") view=|| view! { <Redirect path=AppRoute::Dashboard.href()/> }/>
                    <ParentRoute path=StaticSegment("") view=MainLayout>
                        <Route path=StaticSegment("dashboard") view=DashboardPage/>
                        <Route path=StaticSegment("profile") view=|| view! { <SectionPage route=AppRoute::Profile/> }/>
                        <Route path=StaticSegment("my-okr") view=|| view! { <SectionPage route=AppRoute::MyOkr/> }/>
                        <Route
                            path=(StaticSegment("departments"), StaticSegment("overview"))
                            view=|| view! { <SectionPage route=AppRoute::DepartmentOverview/> }
                        />
                        <Route
                            path=(StaticSegment("departments"), StaticSegment("okr"))
                            view=|| view! { <SectionPage route=AppRoute::DepartmentOkr/> }
                        />
                        <Route
                            path=(StaticSegment("departments"), StaticSegment("kpi"))
                            view=|| view! { <SectionPage route=AppRoute::DepartmentKpi/> }
                        />
                        <Route
                            path=(StaticSegment("departments"), StaticSegment("users"))
                            view=|| view! { <SectionPage route=AppRoute::DepartmentUsers/> }
                        />
                        <Route path=(StaticSegment("admin"), StaticSegment("settings")) view=AdminSettingsPage/>
                        <Route
                            path=(StaticSegment("admin"), StaticSegment("department"))
                            view=|| view! { <SectionPage route=AppRoute::AdminDepartment/> }
                        />
                    </ParentRoute>
                </Routes>
            </RouteGuard>
        </Router>
    }
}
