mod configured;

use decoy::{Method, Parameter, Type};

/// `Store.Save(id: i32, name: String)`
pub fn save() -> Method {
    Method::new(
        Type::reference("Store"),
        "Save",
        [
            Parameter::new("id", Type::i32()),
            Parameter::new("name", Type::string()),
        ],
    )
}
