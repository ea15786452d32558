//! Signed-in page chrome wrapping the nested routes.

use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::components::header::AppHeader;
use crate::components::sidebar::Sidebar;

#[component]
pub fn MainLayout() -> impl IntoView {
    view! {
        <div class="main-layout">
            <Sidebar/>
            <div class="main-layout__body">
                <AppHeader/>
                <main class="main-layout__content">
                    <Outlet/>
                </main>
            </div>
        </div>
    }
}
