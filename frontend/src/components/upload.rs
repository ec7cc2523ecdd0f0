use leptos::html::Input;
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::web_sys::{File, HtmlInputElement};

use crate::api::{SELECT_PDF_MESSAGE, use_api};
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use crate::components::notice::{InlineNotice, Notice, NoticeSlot, NoticeToast};
use crate::config::{UploadMode, use_config};
use crate::error::Operation;
use crate::statement::PdfFile;
use crate::web::task::{InFlight, PageScope};

const DROP_PDF_MESSAGE: &str = "Please drop a PDF file";
const SELECT_FIRST_MESSAGE: &str = "Please select a file first";
const UPLOAD_FIRST_MESSAGE: &str = "Please upload a file first";

fn imported_message(count: u32) -> String {
    format!("Success! Added {} transactions to your budget.", count)
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let config = use_config();
    let scope = PageScope::attach();

    let selected = RwSignal::new(Option::<PdfFile>::None);
    // 两步上传：已上传、待解析的文件名
    let uploaded = RwSignal::new(Option::<String>::None);
    let dragging = RwSignal::new(false);
    let status = NoticeSlot::new();
    let toast = NoticeSlot::new();
    let uploading = InFlight::new();
    let analyzing = InFlight::new();
    let file_input: NodeRef<Input> = NodeRef::new();

    let mode = config.upload_mode;
    let notice_duration = config.notice_duration;

    let report = {
        let scope = scope.clone();
        move |notice: Notice| {
            status.show(notice.clone());
            toast.flash(&scope, notice, notice_duration);
        }
    };

    // 读取文件内容，非 PDF 直接提示
    let accept_file = {
        let scope = scope.clone();
        move |file: File, reject_message: &'static str| {
            if !PdfFile::new(file.name(), file.type_(), Vec::new()).is_pdf() {
                status.show(Notice::error(reject_message));
                return;
            }
            scope.spawn(async move { PdfFile::read(&file).await }, move |res| match res {
                Ok(pdf) => {
                    log!("[Upload] selected {} ({} bytes)", pdf.name, pdf.bytes.len());
                    selected.set(Some(pdf));
                    status.clear();
                }
                Err(e) => {
                    error!("[Upload] {}", e);
                    status.show(Notice::error(SELECT_PDF_MESSAGE));
                }
            });
        }
    };

    let on_file_change = {
        let accept_file = accept_file.clone();
        move |ev: leptos::ev::Event| {
            let input: HtmlInputElement = event_target(&ev);
            match input.files().and_then(|files| files.get(0)) {
                Some(file) => accept_file(file, SELECT_PDF_MESSAGE),
                None => status.show(Notice::error(SELECT_PDF_MESSAGE)),
            }
        }
    };

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        dragging.set(false);
        match ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            Some(file) => accept_file(file, DROP_PDF_MESSAGE),
            None => status.show(Notice::error(DROP_PDF_MESSAGE)),
        }
    };

    let handle_upload = {
        let api = api.clone();
        let scope = scope.clone();
        let report = report.clone();
        move || {
            let Some(file) = selected.get_untracked() else {
                report(Notice::error(SELECT_FIRST_MESSAGE));
                return;
            };
            let Some(user_id) = auth.require_user() else {
                return;
            };
            let Some(guard) = uploading.begin() else {
                return;
            };
            status.show(Notice::info("Uploading..."));

            let api = api.clone();
            let report = report.clone();
            match mode {
                UploadMode::TwoStep => scope.spawn(
                    async move {
                        let _guard = guard;
                        api.upload_pdf(&file, &user_id).await
                    },
                    move |res| match res {
                        Ok(filename) => {
                            log!("[Upload] stored as {}", filename);
                            uploaded.set(Some(filename));
                            selected.set(None);
                            report(Notice::success("File uploaded successfully!"));
                        }
                        Err(e) => {
                            warn!("[Upload] upload failed: {}", e);
                            if !auth.handle_error(&e) {
                                report(Notice::error(e.user_message(Operation::Upload)));
                            }
                        }
                    },
                ),
                UploadMode::OneStep => scope.spawn(
                    async move {
                        let _guard = guard;
                        api.upload_statement(&file, &user_id, UploadMode::OneStep)
                            .await
                    },
                    move |res| match res {
                        Ok(count) => {
                            log!("[Upload] imported {} transactions", count);
                            selected.set(None);
                            report(Notice::success(imported_message(count)));
                        }
                        Err(e) => {
                            warn!("[Upload] upload failed: {}", e);
                            if !auth.handle_error(&e) {
                                report(Notice::error(e.user_message(Operation::Upload)));
                            }
                        }
                    },
                ),
            }
        }
    };

    let handle_analyze = {
        let report = report.clone();
        move |_: leptos::ev::MouseEvent| {
            let Some(filename) = uploaded.get_untracked() else {
                report(Notice::error(UPLOAD_FIRST_MESSAGE));
                return;
            };
            let Some(user_id) = auth.require_user() else {
                return;
            };
            let Some(guard) = analyzing.begin() else {
                return;
            };
            status.show(Notice::info("Analyzing PDF..."));

            let api = api.clone();
            let report = report.clone();
            scope.spawn(
                async move {
                    let _guard = guard;
                    api.process_pdf(&filename, &user_id).await
                },
                move |res| match res {
                    Ok(count) => {
                        log!("[Upload] imported {} transactions", count);
                        uploaded.set(None);
                        report(Notice::success(imported_message(count)));
                    }
                    Err(e) => {
                        warn!("[Upload] processing failed: {}", e);
                        if !auth.handle_error(&e) {
                            report(Notice::error(e.user_message(Operation::ProcessStatement)));
                        }
                    }
                },
            );
        }
    };

    let open_picker = move || {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_primary = move |_: leptos::ev::MouseEvent| {
        if selected.with_untracked(Option::is_none) {
            open_picker();
        } else {
            handle_upload();
        }
    };

    let drop_zone_class = move || {
        if dragging.get() {
            "border-2 border-dashed border-primary bg-primary/10 rounded-box h-48 flex flex-col items-center justify-center cursor-pointer transition"
        } else {
            "border-2 border-dashed border-base-300 bg-base-200 rounded-box h-48 flex flex-col items-center justify-center cursor-pointer transition"
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-3xl mx-auto space-y-8">
                <NoticeToast notice=toast />
                <Navbar />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body items-center gap-6">
                        <h1 class="card-title text-2xl">"Upload Your Statement"</h1>

                        <div
                            class=drop_zone_class
                            on:dragover=move |ev: leptos::ev::DragEvent| {
                                ev.prevent_default();
                                dragging.set(true);
                            }
                            on:dragleave=move |ev: leptos::ev::DragEvent| {
                                ev.prevent_default();
                                dragging.set(false);
                            }
                            on:drop=on_drop
                            on:click=move |_| open_picker()
                        >
                            <p>"Drag & Drop your PDF here or click to browse"</p>
                            <input
                                node_ref=file_input
                                type="file"
                                accept=".pdf,application/pdf"
                                class="hidden"
                                on:click=|ev| ev.stop_propagation()
                                on:change=on_file_change
                            />
                            {move || selected.with(|f| f.as_ref().map(|f| f.name.clone())).map(|name| view! {
                                <p class="mt-2 text-sm">"Selected: " {name}</p>
                            })}
                        </div>

                        <InlineNotice notice=status />

                        <div class="flex gap-4 justify-center w-full">
                            <button
                                class="btn btn-primary"
                                on:click=on_primary
                                disabled=move || uploading.is_pending()
                            >
                                {move || if uploading.is_pending() {
                                    view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                                } else if selected.with(Option::is_some) {
                                    "Upload PDF".into_any()
                                } else {
                                    "Select PDF".into_any()
                                }}
                            </button>
                            <Show when=move || mode == UploadMode::TwoStep>
                                <button
                                    class="btn btn-secondary"
                                    on:click=handle_analyze.clone()
                                    disabled=move || uploaded.with(Option::is_none) || analyzing.is_pending()
                                >
                                    {move || if analyzing.is_pending() {
                                        view! { <span class="loading loading-spinner"></span> "Analyzing..." }.into_any()
                                    } else {
                                        "Analyze PDF".into_any()
                                    }}
                                </button>
                            </Show>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
