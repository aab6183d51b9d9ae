pub mod burst;
mod button;
pub mod card_flip;
mod checkbox;
pub mod control;
mod credit_card;
mod field;
mod form_container;
mod icon;
pub mod input_actions;
mod select;
mod submit_button;
mod text_input;

pub use burst::{BurstAnimator, BurstTicket, Particle, ParticleBurst};
pub use button::{Button, ButtonVariant};
pub use card_flip::{CardFlip, CardFlipAnimator, CardRotation, CardSide, FlipPhase, FlipTicket};
pub use checkbox::Checkbox;
pub use credit_card::{
    CardFace, CreditCardVisualization, format_card_number, format_cvc, format_expiry,
};
pub use field::{FieldCheckbox, FieldErrors, FieldInput, FieldSelect, Label};
pub use form_container::FormContainer;
pub use icon::Icon;
pub use select::{Select, SelectOption};
pub use submit_button::SubmitButton;
pub use text_input::TextInput;
