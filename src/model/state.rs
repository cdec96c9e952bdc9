/// A marker type indicating that a model is **not yet trained**.
///
/// Training methods ([`Trainer::fit`](crate::trainer::Trainer::fit)) take an
/// `Unfitted` model; probabilities and coefficients are not available until
/// the model is converted to `Fitted`.
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model holds only the learned weights and bias: no optimizer,
/// loss function or training hyperparameters.
pub struct Fitted;
