//! Validation of person payloads before they reach a store.
//!
//! A [`Validator`] is an ordered list of [`RuleGroup`]s. Each group is guarded
//! by a [`Gate`]; when the gate reports a failure the group's field rules are
//! skipped and only the gate's failure is recorded. Groups are independent of
//! one another.
//!
//! Within a group every [`FieldRule`] runs. A field rule stops at its first
//! failing [`Check`], so each field contributes at most one failure.

use std::{convert::Infallible, fmt, future::Future, marker::PhantomData, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  person::{NewPerson, UpdatePerson},
  store::PeopleStore,
};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;
pub const ADDRESS_MAX_LEN: usize = 300;

/// Message attached to `id` when an update targets a missing record.
pub const PERSON_NOT_FOUND: &str = "Person not found";

// ─── Failures ────────────────────────────────────────────────────────────────

/// One rule violation, attributed to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
  pub field:   String,
  pub message: String,
}

impl ValidationFailure {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

/// Every failure collected for one payload. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport(Vec<ValidationFailure>);

impl ValidationReport {
  pub fn is_valid(&self) -> bool { self.0.is_empty() }

  pub fn failures(&self) -> &[ValidationFailure] { &self.0 }

  /// Failures attributed to `field`.
  pub fn for_field<'a>(
    &'a self,
    field: &'a str,
  ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
    self.0.iter().filter(move |f| f.field == field)
  }

  pub fn push(&mut self, failure: ValidationFailure) { self.0.push(failure); }

  pub fn into_failures(self) -> Vec<ValidationFailure> { self.0 }
}

impl Extend<ValidationFailure> for ValidationReport {
  fn extend<I: IntoIterator<Item = ValidationFailure>>(&mut self, iter: I) {
    self.0.extend(iter);
  }
}

impl fmt::Display for ValidationReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, failure) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", failure.field, failure.message)?;
    }
    Ok(())
  }
}

// ─── Checks ──────────────────────────────────────────────────────────────────

/// The value a [`FieldRule`] inspects.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
  Text(Option<&'a str>),
  Instant(Option<DateTime<Utc>>),
}

/// A single predicate in a field's chain.
///
/// Absent optional values satisfy every check except [`Check::NotEmpty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
  /// Present and not blank.
  NotEmpty,
  /// At most this many characters.
  MaxLength(usize),
  /// Exactly one `@`, neither leading nor trailing.
  EmailAddress,
  /// No later than the moment of validation.
  NotInFuture,
}

impl Check {
  fn apply(
    self,
    label: &str,
    value: FieldValue<'_>,
    now: DateTime<Utc>,
  ) -> Result<(), String> {
    match (self, value) {
      (Self::NotEmpty, FieldValue::Text(Some(text))) if !text.trim().is_empty() => Ok(()),
      (Self::NotEmpty, FieldValue::Instant(Some(_))) => Ok(()),
      (Self::NotEmpty, _) => Err(format!("'{label}' must not be empty.")),

      (Self::MaxLength(max), FieldValue::Text(Some(text))) => {
        let len = text.chars().count();
        if len > max {
          Err(format!(
            "The length of '{label}' must be {max} characters or fewer. You entered {len} characters."
          ))
        } else {
          Ok(())
        }
      }

      (Self::EmailAddress, FieldValue::Text(Some(text))) if !is_email_address(text) => {
        Err(format!("'{label}' is not a valid email address."))
      }

      (Self::NotInFuture, FieldValue::Instant(Some(at))) if at > now => {
        Err(format!("{label} must be in the past."))
      }

      _ => Ok(()),
    }
  }
}

/// The address grammar accepted for `email`: one `@` separating a non-empty
/// local part from a non-empty domain.
pub fn is_email_address(s: &str) -> bool {
  match s.find('@') {
    Some(at) => at > 0 && at < s.len() - 1 && s.rfind('@') == Some(at),
    None => false,
  }
}

// ─── Field rules ─────────────────────────────────────────────────────────────

/// An ordered chain of [`Check`]s against one field of a [`NewPerson`].
pub struct FieldRule {
  field:  &'static str,
  label:  &'static str,
  value:  fn(&NewPerson) -> FieldValue<'_>,
  checks: Vec<Check>,
}

impl FieldRule {
  /// `field` is the wire name reported in failures; `label` is the human name
  /// interpolated into messages.
  pub fn new(
    field: &'static str,
    label: &'static str,
    value: fn(&NewPerson) -> FieldValue<'_>,
  ) -> Self {
    Self { field, label, value, checks: Vec::new() }
  }

  pub fn check(mut self, check: Check) -> Self {
    self.checks.push(check);
    self
  }

  /// The first failing check, if any. Later checks are not evaluated.
  pub fn evaluate(
    &self,
    person: &NewPerson,
    now: DateTime<Utc>,
  ) -> Option<ValidationFailure> {
    let value = (self.value)(person);
    self
      .checks
      .iter()
      .find_map(|check| check.apply(self.label, value, now).err())
      .map(|message| ValidationFailure::new(self.field, message))
  }
}

/// The field rules shared by creation and update.
pub fn person_rules() -> Vec<FieldRule> {
  vec![
    FieldRule::new("firstName", "First Name", |p| {
      FieldValue::Text(Some(p.first_name.as_str()))
    })
    .check(Check::NotEmpty)
    .check(Check::MaxLength(NAME_MAX_LEN)),
    FieldRule::new("lastName", "Last Name", |p| {
      FieldValue::Text(Some(p.last_name.as_str()))
    })
    .check(Check::NotEmpty)
    .check(Check::MaxLength(NAME_MAX_LEN)),
    FieldRule::new("middleName", "Middle Name", |p| {
      FieldValue::Text(p.middle_name.as_deref())
    })
    .check(Check::MaxLength(NAME_MAX_LEN)),
    FieldRule::new("email", "Email", |p| FieldValue::Text(Some(p.email.as_str())))
      .check(Check::NotEmpty)
      .check(Check::MaxLength(EMAIL_MAX_LEN))
      .check(Check::EmailAddress),
    FieldRule::new("address", "Address", |p| {
      FieldValue::Text(Some(p.address.as_str()))
    })
    .check(Check::NotEmpty)
    .check(Check::MaxLength(ADDRESS_MAX_LEN)),
    FieldRule::new("dateOfBirth", "Date of Birth", |p| {
      FieldValue::Instant(p.date_of_birth)
    })
    .check(Check::NotInFuture),
  ]
}

// ─── Gates ───────────────────────────────────────────────────────────────────

/// A precondition that must hold before a [`RuleGroup`]'s field rules run.
pub trait Gate<T>: Send + Sync {
  type Error;

  /// `Ok(Some(_))` closes the gate with that failure; `Ok(None)` opens it.
  fn check<'a>(
    &'a self,
    target: &'a T,
  ) -> impl Future<Output = Result<Option<ValidationFailure>, Self::Error>> + Send + 'a;
}

/// A gate that is always open.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ungated;

impl<T: Sync> Gate<T> for Ungated {
  type Error = Infallible;

  fn check<'a>(
    &'a self,
    _target: &'a T,
  ) -> impl Future<Output = Result<Option<ValidationFailure>, Infallible>> + Send + 'a {
    std::future::ready(Ok(None))
  }
}

/// Opens only if the store holds a record with the update's id.
pub struct PersonExists<S> {
  store: Arc<S>,
}

impl<S> PersonExists<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S: PeopleStore> Gate<UpdatePerson> for PersonExists<S> {
  type Error = S::Error;

  fn check<'a>(
    &'a self,
    target: &'a UpdatePerson,
  ) -> impl Future<Output = Result<Option<ValidationFailure>, S::Error>> + Send + 'a {
    async move {
      let found = self.store.find_by_id(target.id).await?;
      Ok(
        found
          .is_none()
          .then(|| ValidationFailure::new("id", PERSON_NOT_FOUND)),
      )
    }
  }
}

// ─── Groups and validators ───────────────────────────────────────────────────

/// Field rules that run only when `gate` is open.
pub struct RuleGroup<G> {
  gate:  G,
  rules: Vec<FieldRule>,
}

impl<G> RuleGroup<G> {
  pub fn new(gate: G, rules: Vec<FieldRule>) -> Self { Self { gate, rules } }

  fn evaluate<'a>(
    &'a self,
    person: &'a NewPerson,
    now: DateTime<Utc>,
  ) -> impl Iterator<Item = ValidationFailure> + 'a {
    self.rules.iter().filter_map(move |rule| rule.evaluate(person, now))
  }
}

/// Evaluates [`RuleGroup`]s in order against payloads of type `T`.
pub struct Validator<T, G = Ungated> {
  groups:  Vec<RuleGroup<G>>,
  _target: PhantomData<fn(&T)>,
}

impl<T, G> Default for Validator<T, G> {
  fn default() -> Self { Self { groups: Vec::new(), _target: PhantomData } }
}

impl<T, G> Validator<T, G>
where
  T: AsRef<NewPerson> + Sync,
  G: Gate<T>,
{
  pub fn new() -> Self { Self::default() }

  pub fn group(mut self, group: RuleGroup<G>) -> Self {
    self.groups.push(group);
    self
  }

  /// Collect every failure for `target`.
  ///
  /// An error from a gate aborts validation; it is a storage failure, not a
  /// validation outcome.
  pub async fn validate(&self, target: &T) -> Result<ValidationReport, G::Error> {
    let now = Utc::now();
    let mut report = ValidationReport::default();
    for group in &self.groups {
      if let Some(failure) = group.gate.check(target).await? {
        report.push(failure);
        continue;
      }
      report.extend(group.evaluate(target.as_ref(), now));
    }
    Ok(report)
  }
}

impl<T> Validator<T, Ungated>
where
  T: AsRef<NewPerson>,
{
  /// Synchronous evaluation for validators without store-backed gates.
  pub fn validate_now(&self, target: &T) -> ValidationReport {
    let now = Utc::now();
    let mut report = ValidationReport::default();
    for group in &self.groups {
      report.extend(group.evaluate(target.as_ref(), now));
    }
    report
  }
}

pub type NewPersonValidator = Validator<NewPerson, Ungated>;

pub type UpdatePersonValidator<S> = Validator<UpdatePerson, PersonExists<S>>;

/// Creation rules: every field rule, unconditionally.
pub fn new_person_validator() -> NewPersonValidator {
  Validator::new().group(RuleGroup::new(Ungated, person_rules()))
}

/// Update rules: the same field rules, behind an existence check on `id`.
pub fn update_person_validator<S: PeopleStore>(
  store: Arc<S>,
) -> UpdatePersonValidator<S> {
  Validator::new().group(RuleGroup::new(PersonExists::new(store), person_rules()))
}
