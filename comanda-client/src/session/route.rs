//! Screens of the POS and who may open them

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Authenticated,
    /// Role name `ADMIN`
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Menu,
    Profile,
    Products,
    BarBoard,
    GrillBoard,
    WaiterBoard,
    Settings,
    Stats,
    Rooms,
    Tables,
    Categories,
    Areas,
    Users,
}

impl Route {
    pub const ALL: [Route; 14] = [
        Route::Login,
        Route::Menu,
        Route::Profile,
        Route::Products,
        Route::BarBoard,
        Route::GrillBoard,
        Route::WaiterBoard,
        Route::Settings,
        Route::Stats,
        Route::Rooms,
        Route::Tables,
        Route::Categories,
        Route::Areas,
        Route::Users,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Menu => "/paginaprincipal",
            Route::Profile => "/perfil",
            Route::Products => "/productos",
            Route::BarBoard => "/barravisual",
            Route::GrillBoard => "/planchavisual",
            Route::WaiterBoard => "/mozovisual",
            Route::Settings => "/perfil/configuracion",
            Route::Stats => "/perfil/estadisticas",
            Route::Rooms => "/perfil/salones",
            Route::Tables => "/perfil/mesas",
            Route::Categories => "/perfil/categorias",
            Route::Areas => "/perfil/areas",
            Route::Users => "/perfil/usuarios",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Route::Login => Access::Public,
            Route::Menu
            | Route::Profile
            | Route::Settings
            | Route::BarBoard
            | Route::GrillBoard
            | Route::WaiterBoard => Access::Authenticated,
            Route::Products
            | Route::Stats
            | Route::Rooms
            | Route::Tables
            | Route::Categories
            | Route::Areas
            | Route::Users => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| format!("unknown route: {s}"))
    }
}
