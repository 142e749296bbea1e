// SPDX-License-Identifier: AGPL-3.0-or-later

//! Multi-valued contact methods, stored in junction tables next to the record header.
use std::fmt;

text_enum! {
    /// Kind of email address.
    EmailType ("email type") {
        Personal => "personal",
        Work => "work",
        Other => "other",
    }
}

text_enum! {
    /// Deliverability of an email address.
    EmailStatus ("email status") {
        Active => "active",
        Inactive => "inactive",
        Bounced => "bounced",
        Unsubscribed => "unsubscribed",
    }
}

text_enum! {
    /// Kind of phone number.
    PhoneType ("phone type") {
        Mobile => "mobile",
        Home => "home",
        Work => "work",
        Other => "other",
    }
}

text_enum! {
    /// Reachability of a phone number.
    PhoneStatus ("phone status") {
        Active => "active",
        Inactive => "inactive",
        Disconnected => "disconnected",
    }
}

text_enum! {
    /// Kind of postal address.
    AddressType ("address type") {
        Home => "home",
        Work => "work",
        Mailing => "mailing",
        Other => "other",
    }
}

text_enum! {
    /// Whether a postal address is still in use.
    AddressStatus ("address status") {
        Current => "current",
        Previous => "previous",
        Temporary => "temporary",
    }
}

text_enum! {
    /// Social media platforms a handle can belong to.
    SocialPlatform ("social media platform") {
        Facebook => "facebook",
        Twitter => "twitter",
        Instagram => "instagram",
        Linkedin => "linkedin",
        Other => "other",
    }
}

/// Email address of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub email: String,
    pub email_type: Option<EmailType>,
    pub status: EmailStatus,

    /// Only primary addresses show up in tables and filters.
    pub is_primary: bool,
}

/// Phone number of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Phone {
    pub phone: String,
    pub phone_type: Option<PhoneType>,
    pub status: PhoneStatus,

    /// Only primary numbers show up in tables and filters.
    pub is_primary: bool,
}

/// Postal address of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub address_type: Option<AddressType>,
    pub status: AddressStatus,
    pub is_primary: bool,
}

impl fmt::Display for Address {
    /// Formats the address as `street1[, street2], city, state postal_code`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.street1)?;

        if let Some(street2) = self.street2.as_deref().filter(|street2| !street2.is_empty()) {
            write!(f, ", {}", street2)?;
        }

        write!(f, ", {}, {} {}", self.city, self.state, self.postal_code)
    }
}

/// Social media handle of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialMedia {
    pub platform: SocialPlatform,
    pub username: String,
    pub url: Option<String>,
}

impl fmt::Display for SocialMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.platform, self.username)
    }
}

/// All multi-valued contact methods of one record, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactMethods {
    pub emails: Vec<Email>,
    pub phones: Vec<Phone>,
    pub addresses: Vec<Address>,
    pub social_media: Vec<SocialMedia>,
}

impl ContactMethods {
    /// Returns true when the record has no contact methods at all.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.phones.is_empty()
            && self.addresses.is_empty()
            && self.social_media.is_empty()
    }

    /// Iterator over all primary email addresses.
    pub fn primary_emails(&self) -> impl Iterator<Item = &Email> {
        self.emails.iter().filter(|email| email.is_primary)
    }

    /// Iterator over all primary phone numbers.
    pub fn primary_phones(&self) -> impl Iterator<Item = &Phone> {
        self.phones.iter().filter(|phone| phone.is_primary)
    }

    /// The first primary address, if any.
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_primary)
    }
}
