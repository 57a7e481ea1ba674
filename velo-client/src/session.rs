use velo_model::UserId;

/// 当前访问者。取代浏览器本地存储里的 `userId`，没有登录时就是 `Anonymous`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    User(UserId),
}

impl Session {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Session::Anonymous => None,
            Session::User(id) => Some(*id),
        }
    }
}
