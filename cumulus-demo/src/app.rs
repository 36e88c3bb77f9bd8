use crate::pages::{HomePage, DetailPage, CloudEditPage};

cumulus::define_app! {
    Home => "" as "home" => home: HomePage,
    Detail => "/detail" as "detail" => detail: DetailPage,
    CloudEdit => "/cloudEdit" as "cloudEdit" => cloud_edit: CloudEditPage,
}
