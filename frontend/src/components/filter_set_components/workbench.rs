//! Root of the FilterSet workbench: owns the FilterSet being edited, its save
//! and preset trackers, and the requests that depend on it.

use chrono::Utc;
use dioxus::prelude::*;

use common::{
    alerts::{Alert, AlertStyle},
    app_state::AppAction,
    case::CaseSummary,
    duplicates::{DuplicateBlocks, find_duplicate_blocks},
    facet_dictionary::FacetDictionary,
    filter_set::{FilterSet, FilterSetEditError},
    portal_const::SAVE_THROTTLE_MS,
    save_state::{PresetTracker, SaveState, SaveTracker},
    selection::SelectionState,
    throttle::Throttle,
    variant_sample_list::VariantSampleList,
};

use crate::{
    api::portal_api::{self, api_error},
    components::{
        error_boundary::ApiErrorDisplay,
        filter_set_components::{
            block_list::FilterBlockList, compound_results::CompoundResults, saved_selections::SavedSelections,
            title_bar::FilterSetTitleBar,
        },
        suspend_boundary::{LoadingIndicator, SuspendWrapper},
    },
    data_definitions::app_context::use_app_context,
    routes::Route,
};

/// In-memory edits to the FilterSet.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSetEdit {
    SetTitle(String),
    AddBlock,
    DuplicateBlock(usize),
    RemoveBlock(usize),
    RenameBlock(usize, String),
    SetBlockQuery(usize, String),
    ToggleBlockFlag(usize, String),
}

#[derive(Clone, Copy)]
pub struct WorkbenchState {
    pub case: Signal<CaseSummary>,
    pub filter_set: ReadSignal<FilterSet>,
    pub save_state: Memo<SaveState>,
    pub can_create_preset: Memo<bool>,
    pub duplicates: Memo<DuplicateBlocks>,
    pub selection: Memo<SelectionState>,
    pub set_selection: Callback<SelectionState>,
    pub edit: Callback<FilterSetEdit>,
    pub save: Callback<()>,
    pub create_preset: Callback<String>,
    pub apply_preset: Callback<FilterSet>,
    pub facet_dictionary: Resource<Result<FacetDictionary, ServerFnError>>,
    pub variant_sample_list: Resource<Result<Option<VariantSampleList>, ServerFnError>>,
}

/// Apply one edit, keeping the selection pointed at the same blocks.
fn apply_edit(filter_set: &mut FilterSet, selection: &mut SelectionState, edit: FilterSetEdit) -> Result<(), FilterSetEditError> {
    match edit {
        FilterSetEdit::SetTitle(title) => filter_set.title = title,
        FilterSetEdit::AddBlock => {
            let index = filter_set.add_block("");
            selection.on_block_inserted(index);
        }
        FilterSetEdit::DuplicateBlock(index) => {
            let inserted = filter_set.duplicate_block(index)?;
            selection.on_block_inserted(inserted);
        }
        FilterSetEdit::RemoveBlock(index) => {
            filter_set.remove_block(index)?;
            selection.on_block_removed(index);
        }
        FilterSetEdit::RenameBlock(index, name) => filter_set.rename_block(index, name)?,
        FilterSetEdit::SetBlockQuery(index, query) => filter_set.set_block_query(index, query)?,
        FilterSetEdit::ToggleBlockFlag(index, flag) => filter_set.toggle_block_flag(index, &flag)?,
    }
    Ok(())
}

const WARN_ON_UNLOAD: &str = "window.onbeforeunload = (e) => { e.preventDefault(); e.returnValue = ''; return ''; };";
const CLEAR_ON_UNLOAD: &str = "window.onbeforeunload = null;";

#[component]
pub fn FilterSetWorkbench(case_id: ReadSignal<String>, selection: ReadSignal<SelectionState>) -> Element {
    let loaded = use_resource(move || {
        let case_id = case_id.read().clone();
        portal_api::load_filter_set_workbench(case_id)
    });

    let loaded = loaded.read();
    match loaded.as_ref() {
        None => rsx! { LoadingIndicator { label: "Loading case..." } },
        Some(Err(e)) => rsx! { ApiErrorDisplay { error: api_error(e) } },
        Some(Ok((case, filter_set, origin_preset))) => rsx! {
            WorkbenchLoaded {
                key: "{case.at_id}",
                case: case.clone(),
                loaded_filter_set: filter_set.clone(),
                origin_preset: origin_preset.clone(),
                case_id,
                selection,
            }
        },
    }
}

#[component]
fn WorkbenchLoaded(
    case: CaseSummary,
    loaded_filter_set: FilterSet,
    origin_preset: Option<FilterSet>,
    case_id: ReadSignal<String>,
    selection: ReadSignal<SelectionState>,
) -> Element {
    let app = use_app_context();
    let mut case = use_signal(move || case);
    let mut tracker = use_signal(|| SaveTracker::for_loaded(&loaded_filter_set));
    let mut presets = use_signal(|| PresetTracker::new(origin_preset.as_ref()));
    let mut throttle = use_signal(|| Throttle::new(SAVE_THROTTLE_MS));
    let mut filter_set = use_signal(move || loaded_filter_set);

    let save_state = use_memo(move || tracker.read().state(&filter_set.read()));
    let can_create_preset = use_memo(move || presets.read().can_create_preset(&filter_set.read(), &save_state.read()));
    let duplicates = use_memo(move || find_duplicate_blocks(&filter_set.read().filter_blocks));
    // a shared or stale link may name blocks that no longer exist
    let route_selection = selection;
    let selection = use_memo(move || route_selection.read().normalized(filter_set.read().filter_blocks.len()));

    let unsaved = use_memo(move || save_state.read().has_unsaved_changes());
    use_effect(move || {
        let unsaved = unsaved();
        app.dispatch.call(AppAction::SetUnsavedEdits(unsaved));
        let _ = document::eval(if unsaved { WARN_ON_UNLOAD } else { CLEAR_ON_UNLOAD });
    });
    use_drop(move || {
        app.dispatch.call(AppAction::SetUnsavedEdits(false));
        let _ = document::eval(CLEAR_ON_UNLOAD);
    });

    let set_selection = Callback::new(move |next: SelectionState| {
        if next == *route_selection.peek() {
            return;
        }
        navigator().replace(Route::FilterSetPage { case_id: case_id.peek().clone(), selection: next.into() });
    });

    let edit = Callback::new(move |edit: FilterSetEdit| {
        let mut next_selection = selection.peek().clone();
        let result = apply_edit(&mut filter_set.write(), &mut next_selection, edit);
        match result {
            Ok(()) => set_selection.call(next_selection),
            Err(e) => app.queue_alert(Alert::new("Cannot edit filter block", vec![e.to_string()], AlertStyle::Warning)),
        }
    });

    let save = Callback::new(move |_: ()| {
        if !throttle.write().try_fire(Utc::now()) {
            dioxus::logger::tracing::debug!("save throttled");
            return;
        }
        let current = filter_set.peek().clone();
        if !tracker.write().begin_save(&current) {
            return;
        }
        spawn(async move {
            let case_summary = case.peek().clone();
            match portal_api::save_filter_set(case_summary, current).await {
                Ok(saved) => {
                    if !filter_set.peek().is_saved() {
                        let mut fs = filter_set.write();
                        fs.at_id = saved.filter_set.at_id.clone();
                        fs.uuid = saved.filter_set.uuid.clone();
                    }
                    match saved.link_error {
                        None => {
                            case.write().active_filterset = saved.filter_set.at_id.clone();
                            tracker.write().finish_save(Ok(()));
                        }
                        Some(error) => {
                            dioxus::logger::tracing::error!("FilterSet saved but not linked to the case: {}", error);
                            tracker.write().finish_save(Err(error.clone()));
                            app.report(&error);
                        }
                    }
                }
                Err(e) => {
                    let error = api_error(&e);
                    dioxus::logger::tracing::error!("saving FilterSet failed: {}", error);
                    tracker.write().finish_save(Err(error.clone()));
                    app.report(&error);
                }
            }
        });
    });

    let create_preset = Callback::new(move |title: String| {
        let current = filter_set.peek().clone();
        let project = case.peek().project.clone();
        let user = app.state.peek().session.as_ref().map(|u| u.at_id.clone()).filter(|id| !id.is_empty());
        spawn(async move {
            match portal_api::create_preset(current.clone(), title.clone(), project, user).await {
                Ok(_) => {
                    presets.write().record_preset_created(&current);
                    app.queue_alert(Alert::new("Preset created", vec![format!("Saved preset \"{}\"", title)], AlertStyle::Success));
                }
                Err(e) => app.report(&api_error(&e)),
            }
        });
    });

    let apply_preset = Callback::new(move |preset: FilterSet| {
        if *save_state.peek() == SaveState::Saving {
            return;
        }
        let accession = case.peek().accession.clone();
        let copy = FilterSet::from_preset(&preset, Some(&accession));
        tracker.set(SaveTracker::for_loaded(&copy));
        presets.set(PresetTracker::new(Some(&preset)));
        filter_set.set(copy);
        set_selection.call(SelectionState::default());
    });

    let facet_dictionary = use_resource(move || {
        let search_type = filter_set.read().search_type.clone();
        portal_api::get_facet_dictionary(search_type)
    });

    let variant_sample_list = use_resource(move || {
        let id = case.read().variant_sample_list_id.clone();
        async move {
            match id {
                Some(id) => portal_api::get_variant_sample_list(id).await.map(Some),
                None => Ok(None),
            }
        }
    });

    use_context_provider(move || WorkbenchState {
        case,
        filter_set: filter_set.into(),
        save_state,
        can_create_preset,
        duplicates,
        selection,
        set_selection,
        edit,
        save,
        create_preset,
        apply_preset,
        facet_dictionary,
        variant_sample_list,
    });

    rsx! {
        div {
            id: "x-filter-set-workbench",
            style: "
                height: 100%;
                width: 100%;
                display: flex;
                flex-direction: column;
            ",
            FilterSetTitleBar {}
            div {
                style: "
                    display: flex;
                    flex-direction: row;
                    flex-grow: 1;
                    min-height: 0;
                ",
                div {
                    id: "x-filter-set-left-panel",
                    style: "
                        height: 100%;
                        width: 45%;
                        min-width: 380px;
                        overflow-y: auto;
                        background-color: #ECEEF2;
                        padding: 10px;
                    ",
                    FilterBlockList {}
                    SuspendWrapper { SavedSelections {} }
                }
                div {
                    id: "x-filter-set-right-panel",
                    style: "
                        height: 100%;
                        flex-grow: 1;
                        min-width: 300px;
                        overflow-y: auto;
                        padding: 10px;
                    ",
                    SuspendWrapper { CompoundResults {} }
                }
            }
        }
    }
}
