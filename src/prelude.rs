pub use crate::GalleryProvider;
pub use crate::application::GalleryApplication;
pub use crate::components::{
    Button, ButtonVariant, Checkbox, CreditCardVisualization, FieldCheckbox, FieldErrors,
    FieldInput, FieldSelect, FormContainer, Icon, Label, Select, SelectOption, SubmitButton,
    TextInput,
};
pub use crate::form::{
    FieldApi, FieldIssue, FieldKey, FieldLens, FieldLensExt, FormController, FormModel,
    FormOptions, Schema, Trigger, ValidationError,
};
pub use crate::icon::IconName;
pub use crate::motion::{MotionConfig, MotionLevel};
pub use crate::routes::IndexPage;
pub use crate::theme::Theme;
