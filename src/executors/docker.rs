// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Container image executor
//!
//! The first declared image is the primary container the steps run in;
//! later images are service containers.

use serde::Serialize;
use std::collections::BTreeMap;

/// Registry credentials for a private image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// AWS ECR credentials for a private image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwsAuth {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

impl AwsAuth {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            aws_access_key_id: access_key_id.into(),
            aws_secret_access_key: secret_access_key.into(),
        }
    }
}

/// A single container image declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    entrypoint: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<Auth>,

    #[serde(skip_serializing_if = "Option::is_none")]
    aws_auth: Option<AwsAuth>,
}

impl Image {
    fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            entrypoint: None,
            command: None,
            user: None,
            environment: None,
            auth: None,
            aws_auth: None,
        }
    }

    /// Image reference, e.g. `circleci/node:latest`
    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Executor running a job inside one or more containers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docker {
    images: Vec<Image>,
}

impl Docker {
    /// Create an executor with no images declared yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Docker::new().image(image).done()`
    pub fn with_image(image: impl Into<String>) -> Self {
        Self::new().image(image).done()
    }

    /// Start describing an additional image
    pub fn image(&self, image: impl Into<String>) -> ImageBuilder {
        ImageBuilder {
            parent: self.clone(),
            image: Image::new(image),
        }
    }

    /// Declared images in order, primary first
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// The image steps run in, if any was declared
    pub fn primary(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// Describes one image; [`ImageBuilder::done`] hands back the executor
#[derive(Debug, Clone)]
#[must_use = "call `.done()` to add the image to the executor"]
pub struct ImageBuilder {
    parent: Docker,
    image: Image,
}

impl ImageBuilder {
    pub fn command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image.command = Some(command.into_iter().map(Into::into).collect());
        self
    }

    pub fn entrypoint<I, S>(mut self, entrypoint: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image.entrypoint = Some(entrypoint.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the container environment
    pub fn environment<I, K, V>(mut self, environment: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.image.environment = Some(
            environment
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.image.auth = Some(auth);
        self
    }

    pub fn aws_auth(mut self, aws_auth: AwsAuth) -> Self {
        self.image.aws_auth = Some(aws_auth);
        self
    }

    /// Hostname other containers reach this one by
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.image.name = Some(name.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.image.user = Some(user.into());
        self
    }

    /// Commit the image and return the resulting executor
    pub fn done(self) -> Docker {
        let mut parent = self.parent;
        parent.images.push(self.image);
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_with_image_is_primary() {
        let docker = Docker::with_image("circleci/node:latest");
        assert_eq!(docker.images().len(), 1);
        assert_eq!(docker.primary().unwrap().image(), "circleci/node:latest");
    }

    #[test]
    fn test_image_builder_sets_fields() {
        let docker = Docker::with_image("circleci/ruby:2.5")
            .image("postgres:10")
            .name("db")
            .user("postgres")
            .command(["postgres", "-c", "fsync=off"])
            .environment([("POSTGRES_DB", "test")])
            .auth(Auth::new("bot", "secret"))
            .done();

        let value = serde_yaml::to_value(&docker.images()[1]).unwrap();
        assert_eq!(value["image"], Value::from("postgres:10"));
        assert_eq!(value["name"], Value::from("db"));
        assert_eq!(value["user"], Value::from("postgres"));
        assert_eq!(value["command"], Value::from(vec!["postgres", "-c", "fsync=off"]));
        assert_eq!(value["environment"]["POSTGRES_DB"], Value::from("test"));
        assert_eq!(value["auth"]["username"], Value::from("bot"));
        assert!(value.get("entrypoint").is_none());
        assert!(value.get("aws_auth").is_none());
    }

    #[test]
    fn test_aws_auth_field_names() {
        let docker = Docker::new()
            .image("123.dkr.ecr.us-east-1.amazonaws.com/app")
            .aws_auth(AwsAuth::new("AKIA", "shh"))
            .done();

        let value = serde_yaml::to_value(&docker.images()[0]).unwrap();
        assert_eq!(value["aws_auth"]["aws_access_key_id"], Value::from("AKIA"));
        assert_eq!(value["aws_auth"]["aws_secret_access_key"], Value::from("shh"));
    }

    #[test]
    fn test_image_does_not_touch_parent() {
        let base = Docker::with_image("node:10");
        let extended = base.image("redis:4").done();

        assert_eq!(base.images().len(), 1);
        assert_eq!(extended.images().len(), 2);
        assert_eq!(extended.images()[1].image(), "redis:4");
    }
}
